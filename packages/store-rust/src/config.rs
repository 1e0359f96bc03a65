//! Configuration types for the `LocalSync` store layer.

#[cfg(feature = "redb")]
use std::path::PathBuf;
use std::sync::Arc;

use crate::engine::SharedEngine;
use crate::engines::MemoryEngine;
use crate::sync::SyncConfig;

/// Which [`KeyValueEngine`](crate::KeyValueEngine) backs the stores.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EngineBackend {
    /// Process-local blobs, lost on exit.
    #[default]
    Memory,
    /// Blobs in a redb database file.
    #[cfg(feature = "redb")]
    Redb {
        /// Path of the database file. Created if missing.
        path: PathBuf,
    },
}

/// Engine selection.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub backend: EngineBackend,
}

impl EngineConfig {
    /// Opens the configured engine.
    ///
    /// # Errors
    ///
    /// Returns an error if a file-backed engine cannot be opened.
    pub fn open(&self) -> anyhow::Result<SharedEngine> {
        match &self.backend {
            EngineBackend::Memory => Ok(Arc::new(MemoryEngine::new())),
            #[cfg(feature = "redb")]
            EngineBackend::Redb { path } => Ok(Arc::new(crate::engines::RedbEngine::open(path)?)),
        }
    }
}

/// Top-level configuration: engine plus dispatch policy.
#[derive(Debug, Clone, Default)]
pub struct LocalSyncConfig {
    pub engine: EngineConfig,
    pub sync: SyncConfig,
}
