//! `KeyValueEngine` implementations.
//!
//! Provides concrete backends for the [`KeyValueEngine`](crate::engine::KeyValueEngine)
//! trait: [`MemoryEngine`] for ephemeral data and, with the `redb` feature,
//! [`RedbEngine`] for data that must survive restarts.

mod memory;
#[cfg(feature = "redb")]
mod redb;

pub use memory::MemoryEngine;
#[cfg(feature = "redb")]
pub use self::redb::RedbEngine;
