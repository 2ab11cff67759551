//! Port for record persistence.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Record, RecordPatch};

use super::define_port_error;

define_port_error! {
    /// Errors raised by record store adapters.
    pub enum RecordStoreError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "record store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "record store query failed: {message}",
        /// An update addressed a row that no longer exists.
        Missing { id: i64 } =>
            "record {id} does not exist",
    }
}

/// Persistence gateway for one resource's records.
///
/// Sort properties in a [`PageRequest`] are expected to be resolvable with
/// [`RecordField::from_property`](crate::domain::RecordField::from_property);
/// adapters skip anything else.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Find a record by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Record>, RecordStoreError>;

    /// Read one page of records with the total row count.
    async fn find_all(&self, request: &PageRequest) -> Result<Page<Record>, RecordStoreError>;

    /// Whether a record with `id` exists.
    async fn exists_by_id(&self, id: i64) -> Result<bool, RecordStoreError>;

    /// Insert when `record.id` is absent (assigning a fresh id), otherwise
    /// overwrite every attribute of the existing row.
    ///
    /// Overwriting a row that does not exist yields
    /// [`RecordStoreError::Missing`].
    async fn save(&self, record: &Record) -> Result<Record, RecordStoreError>;

    /// Delete the record if present. Absent ids are not an error.
    async fn delete_by_id(&self, id: i64) -> Result<(), RecordStoreError>;

    /// Atomically read, merge `patch` into, and write back the record.
    ///
    /// Returns `None` when no record exists for `id`.
    async fn merge_update(
        &self,
        id: i64,
        patch: &RecordPatch,
    ) -> Result<Option<Record>, RecordStoreError>;
}
