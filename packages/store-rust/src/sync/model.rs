//! Minimal model and collection bindings read by the sync dispatch.
//!
//! These are not a model framework: they carry exactly what dispatch needs,
//! a record plus where its store can be found.

use std::sync::Arc;

use localsync_core::Record;

use crate::store::SharedStore;

/// A group of models sharing one store.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    store: Option<SharedStore>,
}

impl Collection {
    /// Creates a collection persisted through `store`.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store: Some(store) }
    }

    /// Creates a collection with no store attached.
    #[must_use]
    pub fn detached() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn store(&self) -> Option<&SharedStore> {
        self.store.as_ref()
    }
}

/// A record bound to an optional store and an optional owning collection.
#[derive(Debug, Clone, Default)]
pub struct Model {
    record: Record,
    store: Option<SharedStore>,
    collection: Option<Arc<Collection>>,
}

impl Model {
    /// Wraps `record` with no store and no collection.
    #[must_use]
    pub fn new(record: Record) -> Self {
        Self {
            record,
            store: None,
            collection: None,
        }
    }

    /// Attaches a store directly to the model.
    #[must_use]
    pub fn with_store(mut self, store: SharedStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Places the model in `collection`.
    #[must_use]
    pub fn in_collection(mut self, collection: Arc<Collection>) -> Self {
        self.collection = Some(collection);
        self
    }

    #[must_use]
    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.record.id()
    }

    #[must_use]
    pub fn collection(&self) -> Option<&Arc<Collection>> {
        self.collection.as_ref()
    }

    /// The store this model persists through: its own, else its collection's.
    #[must_use]
    pub fn resolve_store(&self) -> Option<&SharedStore> {
        self.store
            .as_ref()
            .or_else(|| self.collection.as_ref().and_then(|c| c.store()))
    }

    #[must_use]
    pub fn into_record(self) -> Record {
        self.record
    }
}
