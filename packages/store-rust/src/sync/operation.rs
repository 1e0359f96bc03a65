//! Sync request and response types.

use std::fmt;
use std::str::FromStr;

use localsync_core::Record;

use crate::store::StoreError;

/// Persistence operation requested by the model layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncMethod {
    /// Fetch one record (model has an id) or all records (it does not).
    Read,
    Create,
    Update,
    Delete,
}

impl SyncMethod {
    /// Lowercase wire name of the method.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for SyncMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error from parsing an unknown method name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sync method: {0}")]
pub struct ParseMethodError(pub String);

impl FromStr for SyncMethod {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Self::Read),
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(ParseMethodError(other.to_string())),
        }
    }
}

/// Successful result of a sync call.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncResponse {
    /// A single record (find, create, update, delete).
    Record(Record),
    /// A collection-level fetch.
    Records(Vec<Record>),
}

impl SyncResponse {
    /// The single record, if this is a single-record response.
    #[must_use]
    pub fn into_record(self) -> Option<Record> {
        match self {
            Self::Record(record) => Some(record),
            Self::Records(_) => None,
        }
    }

    /// The records of a collection fetch, or the single record as a one-element list.
    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        match self {
            Self::Record(record) => vec![record],
            Self::Records(records) => records,
        }
    }
}

/// Errors returned by a sync call.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// No record was produced: a missing id on read, or an empty fetch under
    /// [`EmptyFetchPolicy::NotFound`](super::EmptyFetchPolicy::NotFound).
    #[error("Record not found")]
    NotFound,
    /// Neither the model nor its collection has a store attached.
    #[error("no store attached to model or collection")]
    NoStore,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_names_round_trip() {
        for method in [
            SyncMethod::Read,
            SyncMethod::Create,
            SyncMethod::Update,
            SyncMethod::Delete,
        ] {
            assert_eq!(method.as_str().parse::<SyncMethod>().unwrap(), method);
            assert_eq!(method.to_string(), method.as_str());
        }
    }

    #[test]
    fn unknown_method_is_rejected() {
        let err = "patch".parse::<SyncMethod>().unwrap_err();
        assert_eq!(err, ParseMethodError("patch".to_string()));
        assert_eq!(err.to_string(), "unknown sync method: patch");
        assert!("READ".parse::<SyncMethod>().is_err());
    }

    #[test]
    fn not_found_message_is_fixed() {
        assert_eq!(SyncError::NotFound.to_string(), "Record not found");
    }

    #[test]
    fn store_errors_pass_through_display() {
        let err = SyncError::from(StoreError::MissingId { operation: "update" });
        assert_eq!(err.to_string(), "update requires a record with an id");
    }

    #[test]
    fn response_conversions() {
        let record = Record::with_id("a", localsync_core::Attributes::new());

        let single = SyncResponse::Record(record.clone());
        assert_eq!(single.clone().into_records(), vec![record.clone()]);
        assert_eq!(single.into_record(), Some(record.clone()));

        let many = SyncResponse::Records(vec![record.clone()]);
        assert!(many.clone().into_record().is_none());
        assert_eq!(many.into_records(), vec![record]);
    }
}
