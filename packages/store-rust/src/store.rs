//! Named record store persisted as a single blob.
//!
//! A [`Store`] is one logical table: a mapping from record identifier to
//! [`Record`], serialized as one JSON object under the store's name in a
//! [`KeyValueEngine`]. The mapping is loaded lazily on first access and the
//! whole mapping is written back after every mutation. Nothing is merged:
//! two instances over the same name overwrite each other, last write wins.

use std::collections::BTreeMap;
use std::sync::Arc;

use localsync_core::{GuidGenerator, IdGenerator, Record};
use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::engine::SharedEngine;

/// In-memory form of a store's blob.
type Table = BTreeMap<String, Record>;

/// Shared store reference, attachable to models and collections.
pub type SharedStore = Arc<Store>;

/// Errors raised by [`Store`] operations.
///
/// A record that simply is not there is NOT an error: lookups return
/// `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{operation} requires a record with an id")]
    MissingId { operation: &'static str },
    #[error("storage engine failed for store `{name}`: {source}")]
    Engine {
        name: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("store `{name}` holds a corrupt blob: {source}")]
    Corrupt {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("store `{name}` could not be serialized: {source}")]
    Encode {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A named table of records backed by one engine blob.
pub struct Store {
    name: String,
    engine: SharedEngine,
    ids: Arc<dyn IdGenerator>,
    data: Mutex<Option<Table>>,
}

impl Store {
    /// Creates a store over `engine` that assigns random GUIDs to new records.
    ///
    /// Nothing is read until the first operation.
    #[must_use]
    pub fn new(name: impl Into<String>, engine: SharedEngine) -> Self {
        Self::with_id_generator(name, engine, Arc::new(GuidGenerator))
    }

    /// Creates a store with a custom identifier source.
    #[must_use]
    pub fn with_id_generator(
        name: impl Into<String>,
        engine: SharedEngine,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            name: name.into(),
            engine,
            ids,
            data: Mutex::new(None),
        }
    }

    /// Name of the blob this store reads and writes.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the mapping has been hydrated from the engine yet.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.data.lock().is_some()
    }

    /// Hydrates the mapping from the engine unless already loaded.
    ///
    /// An absent blob yields an empty mapping. Later writes to the same
    /// blob by other stores are not observed once loaded.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Engine`] if the engine read fails and
    /// [`StoreError::Corrupt`] if the blob is not a JSON object of records.
    pub fn load(&self) -> Result<(), StoreError> {
        self.table().map(drop)
    }

    /// Writes the whole mapping back to the engine, loading it first if needed.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`load`](Self::load), plus
    /// [`StoreError::Encode`] or [`StoreError::Engine`] if the write fails.
    pub fn save(&self) -> Result<(), StoreError> {
        let table = self.table()?;
        self.persist(&table)
    }

    /// Inserts `record`, assigning a generated id if it has none.
    ///
    /// The id is written into the caller's record, so the caller sees the
    /// assignment. Returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns engine, corruption, or encoding errors from load and persist.
    /// A failed persist leaves both the mapping and `record` as they were.
    pub fn create(&self, record: &mut Record) -> Result<Record, StoreError> {
        let mut table = self.table()?;
        let generated = !record.has_id();
        let id = match record.id() {
            Some(id) => id.to_string(),
            None => {
                let id = self.ids.generate();
                record.assign_id(id.clone());
                id
            }
        };
        let previous = table.insert(id.clone(), record.clone());
        if let Err(err) = self.persist(&table) {
            restore(&mut table, &id, previous);
            if generated {
                record.assign_id(String::new());
            }
            return Err(err);
        }
        debug!(store = %self.name, id = %id, "record created");
        Ok(record.clone())
    }

    /// Replaces the stored copy of `record`.
    ///
    /// Inserts the record if no entry exists under its id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingId`] if `record` has no id, otherwise
    /// engine, corruption, or encoding errors. A failed persist leaves the
    /// previous entry in place.
    pub fn update(&self, record: &Record) -> Result<Record, StoreError> {
        let id = require_id(record, "update")?;
        let mut table = self.table()?;
        let previous = table.insert(id.to_string(), record.clone());
        if let Err(err) = self.persist(&table) {
            restore(&mut table, id, previous);
            return Err(err);
        }
        debug!(store = %self.name, id = %id, "record updated");
        Ok(record.clone())
    }

    /// Returns the stored record with `record`'s id, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingId`] if `record` has no id, otherwise
    /// load errors.
    pub fn find(&self, record: &Record) -> Result<Option<Record>, StoreError> {
        let id = require_id(record, "find")?;
        self.find_by_id(id)
    }

    /// Returns the stored record with the given id, if any.
    ///
    /// # Errors
    ///
    /// Returns load errors.
    pub fn find_by_id(&self, id: &str) -> Result<Option<Record>, StoreError> {
        let table = self.table()?;
        Ok(table.get(id).cloned())
    }

    /// Returns every stored record.
    ///
    /// Records come back in ascending id order, which callers should treat
    /// as incidental.
    ///
    /// # Errors
    ///
    /// Returns load errors.
    pub fn find_all(&self) -> Result<Vec<Record>, StoreError> {
        let table = self.table()?;
        Ok(table.values().cloned().collect())
    }

    /// Removes the entry for `record`'s id and returns `record` unchanged.
    ///
    /// Removing an id that is not stored is not an error; the mapping is
    /// still persisted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingId`] if `record` has no id, otherwise
    /// engine, corruption, or encoding errors. A failed persist keeps the
    /// entry.
    pub fn destroy(&self, record: &Record) -> Result<Record, StoreError> {
        let id = require_id(record, "destroy")?;
        let mut table = self.table()?;
        let removed = table.remove(id);
        let existed = removed.is_some();
        if let Err(err) = self.persist(&table) {
            restore(&mut table, id, removed);
            return Err(err);
        }
        debug!(store = %self.name, id = %id, existed, "record destroyed");
        Ok(record.clone())
    }

    /// Number of stored records.
    ///
    /// # Errors
    ///
    /// Returns load errors.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.table()?.len())
    }

    /// Whether the store holds no records.
    ///
    /// # Errors
    ///
    /// Returns load errors.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.table()?.is_empty())
    }

    /// Locks the mapping, hydrating it from the engine on first use.
    ///
    /// The guard is held across mutate-and-persist so one instance never
    /// interleaves its own writes.
    fn table(&self) -> Result<MappedMutexGuard<'_, Table>, StoreError> {
        let mut slot = self.data.lock();
        if slot.is_none() {
            *slot = Some(self.fetch()?);
        }
        Ok(MutexGuard::map(slot, |slot| slot.get_or_insert_with(Table::new)))
    }

    fn fetch(&self) -> Result<Table, StoreError> {
        let blob = self
            .engine
            .get_item(&self.name)
            .map_err(|source| StoreError::Engine {
                name: self.name.clone(),
                source,
            })?;

        let Some(blob) = blob else {
            debug!(store = %self.name, "no blob stored, starting empty");
            return Ok(Table::new());
        };

        let table: Table = serde_json::from_str(&blob).map_err(|source| {
            warn!(store = %self.name, error = %source, "stored blob is not a record mapping");
            StoreError::Corrupt {
                name: self.name.clone(),
                source,
            }
        })?;
        debug!(store = %self.name, records = table.len(), "store loaded");
        Ok(table)
    }

    fn persist(&self, table: &Table) -> Result<(), StoreError> {
        let blob = serde_json::to_string(table).map_err(|source| StoreError::Encode {
            name: self.name.clone(),
            source,
        })?;
        self.engine
            .set_item(&self.name, &blob)
            .map_err(|source| StoreError::Engine {
                name: self.name.clone(),
                source,
            })?;
        debug!(store = %self.name, records = table.len(), bytes = blob.len(), "store persisted");
        Ok(())
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Puts back the entry a failed mutation replaced or removed.
fn restore(table: &mut Table, id: &str, previous: Option<Record>) {
    match previous {
        Some(record) => {
            table.insert(id.to_string(), record);
        }
        None => {
            table.remove(id);
        }
    }
}

fn require_id<'a>(record: &'a Record, operation: &'static str) -> Result<&'a str, StoreError> {
    record.id().ok_or(StoreError::MissingId { operation })
}
