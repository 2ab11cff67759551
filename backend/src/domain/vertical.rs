//! Per-resource configuration for the generic record lifecycle.

use super::{Error, Record, RecordField};

/// Static description of one resource exposed over [`Record`].
///
/// Implementors are zero-sized markers; the lifecycle in
/// [`RecordService`](super::RecordService) is written once and instantiated
/// per marker.
pub trait Vertical: Send + Sync + 'static {
    /// Entity name used in error details and alert headers.
    const ENTITY_NAME: &'static str;
    /// Collection segment under `/api`.
    const COLLECTION: &'static str;
    /// Attributes that must be present on create and replace.
    const REQUIRED_FIELDS: &'static [RecordField];

    /// Check the mandatory attributes of `record`.
    ///
    /// # Errors
    /// Returns a validation error listing every missing attribute.
    fn validate(record: &Record) -> Result<(), Error> {
        let missing: Vec<&str> = Self::REQUIRED_FIELDS
            .iter()
            .filter(|field| !record.has(**field))
            .map(|field| field.wire_name())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::validation_failed(Self::ENTITY_NAME, &missing))
        }
    }

    /// Path of the collection, e.g. `/api/incomes`.
    #[must_use]
    fn collection_path() -> String {
        format!("/api/{}", Self::COLLECTION)
    }
}

/// Income entries: only the amount is mandatory.
#[derive(Debug, Clone, Copy, Default)]
pub struct Income;

impl Vertical for Income {
    const ENTITY_NAME: &'static str = "income";
    const COLLECTION: &'static str = "incomes";
    const REQUIRED_FIELDS: &'static [RecordField] = &[RecordField::IncomeAmount];
}

/// Money entries: roll and amount are mandatory.
#[derive(Debug, Clone, Copy, Default)]
pub struct Money;

impl Vertical for Money {
    const ENTITY_NAME: &'static str = "money";
    const COLLECTION: &'static str = "monies";
    const REQUIRED_FIELDS: &'static [RecordField] =
        &[RecordField::Roll, RecordField::IncomeAmount];
}
