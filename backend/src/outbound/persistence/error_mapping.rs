//! Translation of pool and Diesel failures into record store errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::RecordStoreError;

use super::pool::PoolError;

/// Pool failures mean the store is unreachable.
pub(super) fn map_pool_error(error: PoolError) -> RecordStoreError {
    RecordStoreError::connection(error.into_message())
}

/// Map a Diesel error, keeping driver details out of the message.
pub(super) fn map_diesel_error(error: DieselError) -> RecordStoreError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            RecordStoreError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::NotNullViolation, _) => {
            RecordStoreError::query("mandatory column was null")
        }
        DieselError::NotFound => RecordStoreError::query("record not found"),
        DieselError::QueryBuilderError(_) => RecordStoreError::query("database query error"),
        _ => RecordStoreError::query("database error"),
    }
}

/// Convert a row count or offset into the `i64` Postgres expects.
pub(super) fn to_sql_count(value: u64) -> Result<i64, RecordStoreError> {
    i64::try_from(value).map_err(|_| RecordStoreError::query(format!("{value} exceeds i64")))
}

/// Convert a `COUNT(*)` result back into an unsigned total.
pub(super) fn from_sql_count(value: i64) -> Result<u64, RecordStoreError> {
    u64::try_from(value).map_err(|_| RecordStoreError::query(format!("negative count {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_are_connection_failures() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(err, RecordStoreError::connection("timed out"));
    }

    #[rstest]
    fn not_found_is_a_query_failure() {
        assert_eq!(
            map_diesel_error(DieselError::NotFound),
            RecordStoreError::query("record not found")
        );
    }

    #[rstest]
    fn rollback_is_a_generic_database_error() {
        assert_eq!(
            map_diesel_error(DieselError::RollbackTransaction),
            RecordStoreError::query("database error")
        );
    }

    #[rstest]
    #[case(0, Some(0))]
    #[case(u64::MAX, None)]
    fn counts_convert_within_range(#[case] value: u64, #[case] expected: Option<i64>) {
        assert_eq!(to_sql_count(value).ok(), expected);
    }

    #[rstest]
    fn negative_counts_are_rejected() {
        assert!(from_sql_count(-1).is_err());
        assert_eq!(from_sql_count(3).ok(), Some(3));
    }
}
