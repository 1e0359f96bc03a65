//! `LocalSync` Core: record identifiers and the record type shared by stores.

pub mod guid;
pub mod record;

pub use guid::{guid, guid_with, is_guid, GuidGenerator, IdGenerator, SequentialIds};
pub use record::{Attributes, Record, ID_FIELD};

#[cfg(test)]
mod tests {
    #[test]
    fn crate_loads() {
        // Empty body: if this test runs, the crate compiles and loads.
    }
}
