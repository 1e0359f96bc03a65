//! `LocalSync` Store: named record stores over a local key-value engine,
//! and the sync dispatch that routes model persistence to them.
//!
//! Layers, innermost first:
//!
//! - [`KeyValueEngine`]: flat `name -> blob` storage ([`MemoryEngine`],
//!   and `RedbEngine` with the `redb` feature)
//! - [`Store`]: one named table of records, lazily loaded and fully
//!   rewritten on every mutation
//! - [`sync`]: [`SyncStrategy`] / [`LocalSync`], the dispatch the model layer
//!   calls for `read`, `create`, `update`, and `delete`

pub mod config;
pub mod engine;
pub mod engines;
pub mod factory;
pub mod store;
pub mod sync;

pub use config::{EngineBackend, EngineConfig, LocalSyncConfig};
pub use engine::{KeyValueEngine, SharedEngine};
pub use engines::MemoryEngine;
#[cfg(feature = "redb")]
pub use engines::RedbEngine;
pub use factory::StoreFactory;
pub use store::{SharedStore, Store, StoreError};
pub use sync::{
    Collection, EmptyFetchPolicy, LocalSync, Model, ParsePolicyError, SyncConfig, SyncError,
    SyncMethod, SyncOptions, SyncResponse, SyncStrategy,
};
