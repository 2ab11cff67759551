//! Process-local `RecordStore` backed by a mutex-guarded map.
//!
//! Used by the HTTP tests and by the server when no database URL is
//! configured. Ordering mirrors PostgreSQL: nulls sort last ascending and
//! first descending, with `id` as the final tie-breaker.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use pagination::{Page, PageRequest, SortDirection};

use crate::domain::ports::{RecordStore, RecordStoreError};
use crate::domain::{Record, RecordField, RecordPatch};

#[derive(Debug)]
struct State {
    rows: BTreeMap<i64, Record>,
    next_id: i64,
}

/// In-memory record store.
#[derive(Debug)]
pub struct InMemoryRecordStore {
    state: Mutex<State>,
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRecordStore {
    /// Empty store; ids start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, RecordStoreError> {
        self.state
            .lock()
            .map_err(|_| RecordStoreError::connection("record store mutex poisoned"))
    }
}

fn compare_optional<T: Ord>(left: Option<&T>, right: Option<&T>) -> Ordering {
    match (left, right) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_field(left: &Record, right: &Record, field: RecordField) -> Ordering {
    match field {
        RecordField::Id => compare_optional(left.id.as_ref(), right.id.as_ref()),
        RecordField::Name => compare_optional(left.name.as_ref(), right.name.as_ref()),
        RecordField::Roll => compare_optional(left.roll.as_ref(), right.roll.as_ref()),
        RecordField::IncomeAmount => {
            compare_optional(left.income_amount.as_ref(), right.income_amount.as_ref())
        }
    }
}

fn compare_records(left: &Record, right: &Record, request: &PageRequest) -> Ordering {
    request
        .sort()
        .iter()
        .filter_map(|order| {
            RecordField::from_property(order.property()).map(|field| (field, order.direction()))
        })
        .map(|(field, direction)| {
            let ordering = compare_field(left, right, field);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| compare_field(left, right, RecordField::Id))
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Record>, RecordStoreError> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    async fn find_all(&self, request: &PageRequest) -> Result<Page<Record>, RecordStoreError> {
        let mut rows: Vec<Record> = self.lock()?.rows.values().cloned().collect();
        rows.sort_by(|a, b| compare_records(a, b, request));

        let total = u64::try_from(rows.len())
            .map_err(|_| RecordStoreError::query("row count exceeds u64"))?;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let size = usize::try_from(request.size()).unwrap_or(usize::MAX);
        let content = rows.into_iter().skip(offset).take(size).collect();
        Ok(Page::new(content, request.clone(), total))
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, RecordStoreError> {
        Ok(self.lock()?.rows.contains_key(&id))
    }

    async fn save(&self, record: &Record) -> Result<Record, RecordStoreError> {
        let mut state = self.lock()?;
        let saved = match record.id {
            None => {
                let id = state.next_id;
                state.next_id += 1;
                Record {
                    id: Some(id),
                    ..record.clone()
                }
            }
            Some(id) if state.rows.contains_key(&id) => record.clone(),
            Some(id) => return Err(RecordStoreError::missing(id)),
        };
        if let Some(id) = saved.id {
            state.rows.insert(id, saved.clone());
        }
        Ok(saved)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), RecordStoreError> {
        self.lock()?.rows.remove(&id);
        Ok(())
    }

    async fn merge_update(
        &self,
        id: i64,
        patch: &RecordPatch,
    ) -> Result<Option<Record>, RecordStoreError> {
        let mut state = self.lock()?;
        Ok(state.rows.get_mut(&id).map(|stored| {
            stored.merge(patch);
            stored.clone()
        }))
    }
}
