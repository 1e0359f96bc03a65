//! Key-value engine trait consumed by [`Store`](crate::Store).
//!
//! Defines [`KeyValueEngine`], the innermost storage layer: a flat map from
//! store name to one serialized blob, mirroring the `getItem`/`setItem`
//! contract of a local storage primitive. Implementations decide where the
//! blobs live (process memory, a file on disk).

use std::sync::Arc;

/// Flat `name -> blob` storage.
///
/// All operations are synchronous. Blobs are opaque strings to the engine;
/// the `Store` owns their format.
///
/// Wrapped in `Arc<dyn KeyValueEngine>` so several stores can share one
/// engine.
pub trait KeyValueEngine: Send + Sync + 'static {
    /// Retrieve the blob stored under `name`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read.
    fn get_item(&self, name: &str) -> anyhow::Result<Option<String>>;

    /// Store `value` under `name`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn set_item(&self, name: &str, value: &str) -> anyhow::Result<()>;

    /// Remove the blob stored under `name`. Returns `true` if one existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn remove_item(&self, name: &str) -> anyhow::Result<bool>;

    /// Names of all stored blobs, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read.
    fn names(&self) -> anyhow::Result<Vec<String>>;
}

/// Shared engine reference.
pub type SharedEngine = Arc<dyn KeyValueEngine>;
