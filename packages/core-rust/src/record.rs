//! The record type persisted by a `Store`.
//!
//! A [`Record`] is an opaque JSON object of attributes plus an identifier.
//! The identifier lives in two places, the top-level `id` and the `"id"`
//! attribute, and the two are kept in sync by every mutator here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::trace;

/// Attribute name that mirrors the record identifier.
pub const ID_FIELD: &str = "id";

/// Attribute bag of a record: a JSON object.
pub type Attributes = Map<String, Value>;

/// A structured record with an optional identifier.
///
/// Serializes as its attribute object, so a persisted record is exactly the
/// JSON the caller supplied plus the `"id"` attribute.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Attributes", into = "Attributes")]
pub struct Record {
    id: Option<String>,
    attributes: Attributes,
}

impl Record {
    /// Creates a record from attributes, adopting any usable `"id"` attribute.
    ///
    /// String identifiers are taken as-is and numeric identifiers are
    /// rendered in decimal and written back as a string attribute. Any other
    /// `"id"` attribute (empty string, null, object) is dropped.
    #[must_use]
    pub fn new(attributes: Attributes) -> Self {
        let mut record = Self {
            id: None,
            attributes,
        };
        let id = record
            .attributes
            .get(ID_FIELD)
            .map(usable_id)
            .unwrap_or_default();
        record.assign_id(id);
        record
    }

    /// Creates a record with an explicit identifier, overriding any `"id"` attribute.
    #[must_use]
    pub fn with_id(id: impl Into<String>, attributes: Attributes) -> Self {
        let mut record = Self {
            id: None,
            attributes,
        };
        record.assign_id(id.into());
        record
    }

    /// Parses a JSON object into a record.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not valid JSON or is not an object.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let attributes: Attributes = serde_json::from_str(json)?;
        Ok(Self::new(attributes))
    }

    /// The record identifier, if one has been assigned.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Whether the record carries an identifier.
    #[must_use]
    pub fn has_id(&self) -> bool {
        self.id.is_some()
    }

    /// Sets the identifier on both the record and its `"id"` attribute.
    ///
    /// An empty `id` clears the identifier instead.
    pub fn assign_id(&mut self, id: String) {
        if id.is_empty() {
            self.id = None;
            self.attributes.remove(ID_FIELD);
            return;
        }
        self.attributes
            .insert(ID_FIELD.to_string(), Value::String(id.clone()));
        self.id = Some(id);
    }

    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Looks up a single attribute.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Sets a single attribute, returning the previous value.
    ///
    /// Setting `"id"` goes through [`assign_id`](Self::assign_id), so a value
    /// that cannot serve as an identifier clears it.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        if key == ID_FIELD {
            let previous = self.attributes.get(ID_FIELD).cloned();
            self.assign_id(usable_id(&value));
            return previous;
        }
        self.attributes.insert(key, value)
    }

    /// Consumes the record, returning its attributes (including `"id"`).
    #[must_use]
    pub fn into_attributes(self) -> Attributes {
        self.attributes
    }

    /// The record as a JSON object value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(self.attributes.clone())
    }
}

impl From<Attributes> for Record {
    fn from(attributes: Attributes) -> Self {
        Self::new(attributes)
    }
}

impl From<Record> for Attributes {
    fn from(record: Record) -> Self {
        record.attributes
    }
}

/// The identifier `value` stands for, or an empty string if it cannot serve as one.
fn usable_id(value: &Value) -> String {
    id_from_value(value).unwrap_or_else(|| {
        trace!(id = %value, "dropping unusable id attribute");
        String::new()
    })
}

fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
