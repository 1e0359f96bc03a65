//! Durable [`KeyValueEngine`] implementation backed by a [`redb`] file.
//!
//! All blobs live in a single `blobs` table keyed by store name. Each
//! `set_item`/`remove_item` is its own committed write transaction, so a
//! blob on disk is always either the previous or the new full version.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use redb::{Database, ReadableTable, TableDefinition};
use tracing::debug;

use crate::engine::KeyValueEngine;

const BLOBS: TableDefinition<&str, &str> = TableDefinition::new("blobs");

/// File-backed engine that survives process restarts.
pub struct RedbEngine {
    db: Database,
    path: PathBuf,
}

impl RedbEngine {
    /// Opens (or creates) the database file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or is not a valid
    /// redb database.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let db = Database::create(&path)
            .with_context(|| format!("opening redb database at {}", path.display()))?;

        // Create the table up front so reads never hit a missing table.
        let txn = db.begin_write()?;
        txn.open_table(BLOBS)?;
        txn.commit()?;

        debug!(path = %path.display(), "redb engine opened");
        Ok(Self { db, path })
    }

    /// Path of the backing database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for RedbEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbEngine")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl KeyValueEngine for RedbEngine {
    fn get_item(&self, name: &str) -> anyhow::Result<Option<String>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(BLOBS)?;
        let blob = table.get(name)?.map(|guard| guard.value().to_string());
        Ok(blob)
    }

    fn set_item(&self, name: &str, value: &str) -> anyhow::Result<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(BLOBS)?;
            table.insert(name, value)?;
        }
        txn.commit()
            .with_context(|| format!("committing blob `{name}`"))?;
        Ok(())
    }

    fn remove_item(&self, name: &str) -> anyhow::Result<bool> {
        let txn = self.db.begin_write()?;
        let removed = {
            let mut table = txn.open_table(BLOBS)?;
            let previous = table.remove(name)?;
            previous.is_some()
        };
        txn.commit()
            .with_context(|| format!("committing removal of `{name}`"))?;
        Ok(removed)
    }

    fn names(&self) -> anyhow::Result<Vec<String>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(BLOBS)?;
        let mut names = Vec::new();
        for entry in table.iter()? {
            let (key, _) = entry?;
            names.push(key.value().to_string());
        }
        Ok(names)
    }
}
