//! PostgreSQL-backed `RecordStore` implementations using Diesel ORM.
//!
//! Both tables share a column layout, so the store is generated once per
//! table by `diesel_record_store!`. The only difference is how `roll` is
//! written: nullable for income, mandatory for money.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use pagination::{Page, PageRequest, SortDirection};
use tracing::debug;

use crate::domain::ports::{RecordStore, RecordStoreError};
use crate::domain::{Record, RecordField, RecordPatch};

use super::error_mapping::{from_sql_count, map_diesel_error, map_pool_error, to_sql_count};
use super::models::RecordRow;
use super::pool::DbPool;
use super::schema::{income, money};

/// Failure inside a merge transaction: either the database or the row
/// could not be rebuilt after merging.
#[derive(Debug)]
enum MergeError {
    Diesel(DieselError),
    Store(RecordStoreError),
}

impl From<DieselError> for MergeError {
    fn from(error: DieselError) -> Self {
        Self::Diesel(error)
    }
}

impl From<MergeError> for RecordStoreError {
    fn from(error: MergeError) -> Self {
        match error {
            MergeError::Diesel(err) => map_diesel_error(err),
            MergeError::Store(err) => err,
        }
    }
}

fn amount(record: &Record) -> Result<i32, RecordStoreError> {
    record
        .income_amount
        .ok_or_else(|| RecordStoreError::query("income is mandatory"))
}

fn nullable_roll(record: &Record) -> Result<Option<String>, RecordStoreError> {
    Ok(record.roll.clone())
}

fn required_roll(record: &Record) -> Result<String, RecordStoreError> {
    record
        .roll
        .clone()
        .ok_or_else(|| RecordStoreError::query("roll is mandatory"))
}

/// Select list matching [`RecordRow`]; a mandatory `roll` is widened to
/// nullable so both tables load into the same row type.
macro_rules! record_columns {
    ($table:ident, nullable_roll) => {
        ($table::id, $table::name, $table::roll, $table::income_amount)
    };
    ($table:ident, required_roll) => {
        (
            $table::id,
            $table::name,
            $table::roll.nullable(),
            $table::income_amount,
        )
    };
}

macro_rules! diesel_record_store {
    (
        $(#[$meta:meta])*
        pub struct $store:ident for $table:ident {
            roll: $roll_ty:ty = $roll_fn:ident $(,)?
        }
    ) => {
        ::paste::paste! {
            /// Values written on insert and on full replace.
            #[derive(Debug, Clone, Insertable, AsChangeset)]
            #[diesel(table_name = $table)]
            #[diesel(treat_none_as_null = true)]
            struct [<$store Row>] {
                name: Option<String>,
                roll: $roll_ty,
                income_amount: i32,
            }

            impl [<$store Row>] {
                fn try_from_record(record: &Record) -> Result<Self, RecordStoreError> {
                    Ok(Self {
                        name: record.name.clone(),
                        roll: $roll_fn(record)?,
                        income_amount: amount(record)?,
                    })
                }
            }

            $(#[$meta])*
            #[derive(Clone)]
            pub struct $store {
                pool: DbPool,
            }

            impl $store {
                /// Create a store over `pool`.
                pub fn new(pool: DbPool) -> Self {
                    Self { pool }
                }
            }

            #[async_trait]
            impl RecordStore for $store {
                async fn find_by_id(&self, id: i64) -> Result<Option<Record>, RecordStoreError> {
                    let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                    let row = $table::table
                        .find(id)
                        .select(record_columns!($table, $roll_fn))
                        .first::<RecordRow>(&mut conn)
                        .await
                        .optional()
                        .map_err(map_diesel_error)?;
                    Ok(row.map(Record::from))
                }

                async fn find_all(
                    &self,
                    request: &PageRequest,
                ) -> Result<Page<Record>, RecordStoreError> {
                    let limit = to_sql_count(request.size())?;
                    let offset = to_sql_count(request.offset())?;

                    let mut query = $table::table
                        .select(record_columns!($table, $roll_fn))
                        .into_boxed::<Pg>();
                    for order in request.sort() {
                        let Some(field) = RecordField::from_property(order.property()) else {
                            debug!(property = order.property(), "skipping unknown sort property");
                            continue;
                        };
                        query = match (field, order.direction()) {
                            (RecordField::Id, SortDirection::Asc) => query.then_order_by($table::id.asc()),
                            (RecordField::Id, SortDirection::Desc) => query.then_order_by($table::id.desc()),
                            (RecordField::Name, SortDirection::Asc) => query.then_order_by($table::name.asc()),
                            (RecordField::Name, SortDirection::Desc) => query.then_order_by($table::name.desc()),
                            (RecordField::Roll, SortDirection::Asc) => query.then_order_by($table::roll.asc()),
                            (RecordField::Roll, SortDirection::Desc) => query.then_order_by($table::roll.desc()),
                            (RecordField::IncomeAmount, SortDirection::Asc) => {
                                query.then_order_by($table::income_amount.asc())
                            }
                            (RecordField::IncomeAmount, SortDirection::Desc) => {
                                query.then_order_by($table::income_amount.desc())
                            }
                        };
                    }
                    // Stable paging across equal sort keys.
                    query = query.then_order_by($table::id.asc());

                    let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                    // Count and slice inside one transaction so both observe
                    // the same snapshot.
                    let (rows, total) = conn
                        .transaction::<_, DieselError, _>(|conn| {
                            async move {
                                let total = $table::table.count().get_result::<i64>(conn).await?;
                                let rows = query
                                    .limit(limit)
                                    .offset(offset)
                                    .load::<RecordRow>(conn)
                                    .await?;
                                Ok((rows, total))
                            }
                            .scope_boxed()
                        })
                        .await
                        .map_err(map_diesel_error)?;

                    let content = rows.into_iter().map(Record::from).collect();
                    Ok(Page::new(content, request.clone(), from_sql_count(total)?))
                }

                async fn exists_by_id(&self, id: i64) -> Result<bool, RecordStoreError> {
                    let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                    diesel::select(exists($table::table.find(id)))
                        .get_result::<bool>(&mut conn)
                        .await
                        .map_err(map_diesel_error)
                }

                async fn save(&self, record: &Record) -> Result<Record, RecordStoreError> {
                    let row = [<$store Row>]::try_from_record(record)?;
                    let mut conn = self.pool.get().await.map_err(map_pool_error)?;

                    let saved = match record.id {
                        None => diesel::insert_into($table::table)
                            .values(&row)
                            .returning(record_columns!($table, $roll_fn))
                            .get_result::<RecordRow>(&mut conn)
                            .await
                            .map_err(map_diesel_error)?,
                        Some(id) => diesel::update($table::table.find(id))
                            .set(&row)
                            .returning(record_columns!($table, $roll_fn))
                            .get_result::<RecordRow>(&mut conn)
                            .await
                            .optional()
                            .map_err(map_diesel_error)?
                            .ok_or_else(|| RecordStoreError::missing(id))?,
                    };
                    Ok(Record::from(saved))
                }

                async fn delete_by_id(&self, id: i64) -> Result<(), RecordStoreError> {
                    let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                    diesel::delete($table::table.find(id))
                        .execute(&mut conn)
                        .await
                        .map(|_| ())
                        .map_err(map_diesel_error)
                }

                async fn merge_update(
                    &self,
                    id: i64,
                    patch: &RecordPatch,
                ) -> Result<Option<Record>, RecordStoreError> {
                    let mut conn = self.pool.get().await.map_err(map_pool_error)?;

                    // Row lock held from read to write so concurrent patches
                    // on the same id serialise.
                    let merged = conn
                        .transaction::<_, MergeError, _>(|conn| {
                            async move {
                                let current = $table::table
                                    .find(id)
                                    .select(record_columns!($table, $roll_fn))
                                    .for_update()
                                    .first::<RecordRow>(conn)
                                    .await
                                    .optional()?;
                                let Some(current) = current else {
                                    return Ok(None);
                                };

                                let mut record = Record::from(current);
                                record.merge(patch);
                                let row = [<$store Row>]::try_from_record(&record)
                                    .map_err(MergeError::Store)?;

                                let saved = diesel::update($table::table.find(id))
                                    .set(&row)
                                    .returning(record_columns!($table, $roll_fn))
                                    .get_result::<RecordRow>(conn)
                                    .await?;
                                Ok(Some(Record::from(saved)))
                            }
                            .scope_boxed()
                        })
                        .await?;
                    Ok(merged)
                }
            }
        }
    };
}

diesel_record_store! {
    /// Diesel-backed store for the `income` table.
    pub struct DieselIncomeStore for income {
        roll: Option<String> = nullable_roll,
    }
}

diesel_record_store! {
    /// Diesel-backed store for the `money` table.
    pub struct DieselMoneyStore for money {
        roll: String = required_roll,
    }
}

#[cfg(test)]
mod tests {
    //! Row conversion; query behaviour is covered against embedded
    //! PostgreSQL in `tests/diesel_record_store.rs`.

    use super::*;
    use rstest::rstest;

    #[rstest]
    fn income_rows_allow_a_missing_roll() {
        let row = DieselIncomeStoreRow::try_from_record(&Record::new().with_income_amount(3))
            .expect("income row");
        assert_eq!(row.roll, None);
        assert_eq!(row.income_amount, 3);
    }

    #[rstest]
    fn money_rows_require_roll() {
        let err = DieselMoneyStoreRow::try_from_record(&Record::new().with_income_amount(3))
            .expect_err("roll missing");
        assert_eq!(err, RecordStoreError::query("roll is mandatory"));
    }

    #[rstest]
    fn rows_require_an_amount() {
        let err = DieselIncomeStoreRow::try_from_record(&Record::new())
            .expect_err("amount missing");
        assert_eq!(err, RecordStoreError::query("income is mandatory"));
    }

    #[rstest]
    fn merge_errors_keep_store_failures() {
        let err = RecordStoreError::from(MergeError::Store(RecordStoreError::missing(2_i64)));
        assert_eq!(err, RecordStoreError::Missing { id: 2 });
    }
}
