//! Internal Diesel row structs.
//!
//! Rows never leave the persistence layer; stores convert them into
//! [`Record`] before returning.

use diesel::prelude::*;

use crate::domain::Record;

/// Row read from either record table.
///
/// Loaded positionally from `(id, name, roll, income)`; `roll` is selected as
/// nullable so both tables share this shape.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct RecordRow {
    pub id: i64,
    pub name: Option<String>,
    pub roll: Option<String>,
    pub income_amount: i32,
}

impl From<RecordRow> for Record {
    fn from(row: RecordRow) -> Self {
        Self {
            id: Some(row.id),
            name: row.name,
            roll: row.roll,
            income_amount: Some(row.income_amount),
        }
    }
}
