//! Record lifecycle shared by every resource.
//!
//! [`RecordService`] enforces the identity and validation rules for create,
//! replace, partial update, read, list and delete. It is transport agnostic;
//! the HTTP adapter only parses input and maps outcomes to responses.

use std::marker::PhantomData;
use std::sync::Arc;

use pagination::{Page, PageRequest};
use tracing::{debug, error};

use crate::domain::ports::{RecordStore, RecordStoreError};
use crate::domain::{Error, InvalidStateReason, Record, RecordField, RecordPatch, Vertical};

/// Lifecycle service for the resource described by `V`.
pub struct RecordService<V> {
    store: Arc<dyn RecordStore>,
    vertical: PhantomData<fn() -> V>,
}

impl<V> Clone for RecordService<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            vertical: PhantomData,
        }
    }
}

impl<V: Vertical> RecordService<V> {
    /// Create a service over `store`.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            vertical: PhantomData,
        }
    }

    /// Persist a new record and return it with its assigned id.
    ///
    /// # Errors
    /// `InvalidState(idexists)` when the record already carries an id,
    /// `ValidationFailed` when mandatory attributes are missing.
    pub async fn create(&self, record: Record) -> Result<Record, Error> {
        debug!(entity = V::ENTITY_NAME, "REST request to save {}", V::ENTITY_NAME);
        if record.id.is_some() {
            return Err(Error::invalid_state(
                V::ENTITY_NAME,
                InvalidStateReason::IdExists,
            ));
        }
        V::validate(&record)?;
        self.store.save(&record).await.map_err(Self::store_error)
    }

    /// Overwrite every attribute of the record at `id`.
    ///
    /// # Errors
    /// `InvalidState` with `idnull`, `idinvalid` or `idnotfound`, or
    /// `ValidationFailed` when mandatory attributes are missing.
    pub async fn replace(&self, id: i64, record: Record) -> Result<Record, Error> {
        debug!(entity = V::ENTITY_NAME, id, "REST request to update {}", V::ENTITY_NAME);
        Self::check_identity(id, &record)?;
        V::validate(&record)?;
        if !self.exists(id).await? {
            return Err(Self::id_not_found());
        }
        match self.store.save(&record).await {
            Ok(saved) => Ok(saved),
            // Deleted between the existence check and the write.
            Err(RecordStoreError::Missing { .. }) => Err(Self::id_not_found()),
            Err(err) => Err(Self::store_error(err)),
        }
    }

    /// Merge the non-null attributes of `record` into the record at `id`.
    ///
    /// # Errors
    /// `InvalidState` with `idnull` or `idinvalid`, `NotFound` when no record
    /// exists for `id`.
    pub async fn partial_update(&self, id: i64, record: Record) -> Result<Record, Error> {
        debug!(
            entity = V::ENTITY_NAME,
            id,
            "REST request to partially update {}",
            V::ENTITY_NAME
        );
        Self::check_identity(id, &record)?;
        let patch = RecordPatch::from(record);
        self.store
            .merge_update(id, &patch)
            .await
            .map_err(Self::store_error)?
            .ok_or_else(|| Error::not_found(V::ENTITY_NAME))
    }

    /// Fetch the record at `id`.
    ///
    /// # Errors
    /// `NotFound` when absent.
    pub async fn get(&self, id: i64) -> Result<Record, Error> {
        debug!(entity = V::ENTITY_NAME, id, "REST request to get {}", V::ENTITY_NAME);
        self.store
            .find_by_id(id)
            .await
            .map_err(Self::store_error)?
            .ok_or_else(|| Error::not_found(V::ENTITY_NAME))
    }

    /// Read one page of records.
    ///
    /// # Errors
    /// `ValidationFailed` when a sort property names no record attribute.
    pub async fn list(&self, request: &PageRequest) -> Result<Page<Record>, Error> {
        debug!(
            entity = V::ENTITY_NAME,
            page = request.page(),
            size = request.size(),
            "REST request to get a page of {}",
            V::COLLECTION
        );
        if let Some(order) = request
            .sort()
            .iter()
            .find(|order| RecordField::from_property(order.property()).is_none())
        {
            return Err(Error::bad_parameter(
                V::ENTITY_NAME,
                "badsort",
                format!(
                    "cannot sort {} by unknown property '{}'",
                    V::COLLECTION,
                    order.property()
                ),
            ));
        }
        self.store.find_all(request).await.map_err(Self::store_error)
    }

    /// Remove the record at `id`; absent ids succeed.
    ///
    /// # Errors
    /// Only store failures.
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        debug!(entity = V::ENTITY_NAME, id, "REST request to delete {}", V::ENTITY_NAME);
        self.store.delete_by_id(id).await.map_err(Self::store_error)
    }

    fn check_identity(id: i64, record: &Record) -> Result<(), Error> {
        match record.id {
            None => Err(Error::invalid_state(
                V::ENTITY_NAME,
                InvalidStateReason::IdNull,
            )),
            Some(body_id) if body_id != id => Err(Error::invalid_state(
                V::ENTITY_NAME,
                InvalidStateReason::IdInvalid,
            )),
            Some(_) => Ok(()),
        }
    }

    async fn exists(&self, id: i64) -> Result<bool, Error> {
        self.store
            .exists_by_id(id)
            .await
            .map_err(Self::store_error)
    }

    fn id_not_found() -> Error {
        Error::invalid_state(V::ENTITY_NAME, InvalidStateReason::IdNotFound)
    }

    fn store_error(err: RecordStoreError) -> Error {
        error!(entity = V::ENTITY_NAME, error = %err, "record store failure");
        Error::internal(format!("{} store error: {err}", V::ENTITY_NAME))
    }
}

#[cfg(test)]
#[path = "record_service_tests.rs"]
mod tests;
