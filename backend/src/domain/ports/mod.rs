//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod record_store;

#[cfg(test)]
pub use record_store::MockRecordStore;
pub use record_store::{RecordStore, RecordStoreError};
