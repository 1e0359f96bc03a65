//! Factory for [`Store`] instances sharing one engine.
//!
//! [`StoreFactory`] is the dependency injection point: it holds the engine
//! and the identifier source, and hands out one [`SharedStore`] per name.

use std::sync::Arc;

use localsync_core::{GuidGenerator, IdGenerator};

use crate::config::EngineConfig;
use crate::engine::SharedEngine;
use crate::store::{SharedStore, Store};

/// Creates stores over a shared engine.
///
/// Each call to [`create()`](StoreFactory::create) yields a NEW instance
/// with its own lazily-loaded mapping. Two instances over the same name are
/// not coordinated.
pub struct StoreFactory {
    engine: SharedEngine,
    ids: Arc<dyn IdGenerator>,
}

impl StoreFactory {
    /// Creates a factory over `engine` using random GUIDs.
    #[must_use]
    pub fn new(engine: SharedEngine) -> Self {
        Self {
            engine,
            ids: Arc::new(GuidGenerator),
        }
    }

    /// Opens the configured engine and wraps it in a factory.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot be opened.
    pub fn from_config(config: &EngineConfig) -> anyhow::Result<Self> {
        Ok(Self::new(config.open()?))
    }

    /// Replaces the identifier source used by stores created afterwards.
    #[must_use]
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Creates a store named `name`.
    #[must_use]
    pub fn create(&self, name: &str) -> SharedStore {
        Arc::new(Store::with_id_generator(
            name,
            Arc::clone(&self.engine),
            Arc::clone(&self.ids),
        ))
    }

    /// Names of all stores that have been persisted to the engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot be read.
    pub fn stored_names(&self) -> anyhow::Result<Vec<String>> {
        let mut names = self.engine.names()?;
        names.sort();
        Ok(names)
    }

    /// Deletes the blob of store `name`. Returns `true` if it existed.
    ///
    /// Live instances over that name keep their loaded mapping and will
    /// write it back on their next mutation.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot be written.
    pub fn drop_store(&self, name: &str) -> anyhow::Result<bool> {
        self.engine.remove_item(name)
    }

    #[must_use]
    pub fn engine(&self) -> &SharedEngine {
        &self.engine
    }
}
