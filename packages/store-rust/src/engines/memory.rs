//! In-memory [`KeyValueEngine`] implementation backed by [`DashMap`].
//!
//! Blobs live only as long as the engine. Suitable for tests and for
//! session-scoped data that should not outlive the process.

use dashmap::DashMap;

use crate::engine::KeyValueEngine;

/// In-memory engine backed by [`DashMap`] for concurrent access.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    items: DashMap<String, String>,
}

impl MemoryEngine {
    /// Creates a new, empty `MemoryEngine`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueEngine for MemoryEngine {
    fn get_item(&self, name: &str) -> anyhow::Result<Option<String>> {
        Ok(self.items.get(name).map(|blob| blob.clone()))
    }

    fn set_item(&self, name: &str, value: &str) -> anyhow::Result<()> {
        self.items.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, name: &str) -> anyhow::Result<bool> {
        Ok(self.items.remove(name).is_some())
    }

    fn names(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.items.iter().map(|entry| entry.key().clone()).collect())
    }
}
