//! Sync dispatch between the model layer and local stores.
//!
//! 1. **Bindings** (`model`): a record plus the store it persists through
//! 2. **Operations** (`operation`): methods, responses, and errors
//! 3. **Dispatch** (`dispatch`): `SyncStrategy` and its local implementation
//! 4. **Config** (`config`): routing policy for empty fetches

pub mod config;
pub mod dispatch;
pub mod model;
pub mod operation;

pub use config::{EmptyFetchPolicy, ParsePolicyError, SyncConfig};
pub use dispatch::{LocalSync, SyncOptions, SyncStrategy};
pub use model::{Collection, Model};
pub use operation::{ParseMethodError, SyncError, SyncMethod, SyncResponse};
