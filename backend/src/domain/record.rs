//! Ledger record shared by the income and money resources.
//!
//! Both resources carry the same four attributes; what differs between them
//! (entity name, collection path, mandatory fields) lives on
//! [`Vertical`](super::Vertical).

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single income or money entry.
///
/// The identifier is absent until the store first persists the record and
/// never changes afterwards. Equality is identity based: two records are
/// equal only when both carry the same id, and an unsaved record equals
/// nothing but itself.
///
/// # Examples
/// ```
/// use backend::domain::Record;
///
/// let saved = Record::new().with_id(7).with_income_amount(10);
/// let same_row = Record::new().with_id(7).with_name("renamed");
/// assert_eq!(saved, same_row);
///
/// let draft = Record::new().with_income_amount(10);
/// assert_ne!(draft, draft.clone());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Store-assigned identifier.
    #[schema(example = 1001)]
    pub id: Option<i64>,
    /// Free-form label.
    #[schema(example = "AAAAAAAAAA")]
    pub name: Option<String>,
    /// Roll reference; mandatory for money entries.
    #[schema(example = "AAAAAAAAAA")]
    pub roll: Option<String>,
    /// Amount, serialised under the `income` key.
    #[serde(rename = "income")]
    #[schema(example = 1)]
    pub income_amount: Option<i32>,
}

impl Record {
    /// Empty, unsaved record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identifier.
    #[must_use]
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the roll.
    #[must_use]
    pub fn with_roll(mut self, roll: impl Into<String>) -> Self {
        self.roll = Some(roll.into());
        self
    }

    /// Set the amount.
    #[must_use]
    pub fn with_income_amount(mut self, amount: i32) -> Self {
        self.income_amount = Some(amount);
        self
    }

    /// Overwrite every attribute for which `patch` carries a value.
    ///
    /// The identifier is never touched.
    pub fn merge(&mut self, patch: &RecordPatch) {
        if let Some(name) = &patch.name {
            self.name = Some(name.clone());
        }
        if let Some(roll) = &patch.roll {
            self.roll = Some(roll.clone());
        }
        if let Some(amount) = patch.income_amount {
            self.income_amount = Some(amount);
        }
    }

    /// Value of `field` as a presence flag, used by mandatory-field checks.
    #[must_use]
    pub fn has(&self, field: RecordField) -> bool {
        match field {
            RecordField::Id => self.id.is_some(),
            RecordField::Name => self.name.is_some(),
            RecordField::Roll => self.roll.is_some(),
            RecordField::IncomeAmount => self.income_amount.is_some(),
        }
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
    }
}

/// Attribute changes applied by a partial update.
///
/// `None` means "leave unchanged"; a patch cannot clear a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement roll.
    pub roll: Option<String>,
    /// Replacement amount.
    pub income_amount: Option<i32>,
}

impl RecordPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.roll.is_none() && self.income_amount.is_none()
    }
}

impl From<Record> for RecordPatch {
    fn from(record: Record) -> Self {
        Self {
            name: record.name,
            roll: record.roll,
            income_amount: record.income_amount,
        }
    }
}

/// Addressable record attribute.
///
/// Wire names match the JSON keys, so `income` addresses the amount. Sort
/// parameters also accept the attribute name `incomeAmount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    /// `id`
    Id,
    /// `name`
    Name,
    /// `roll`
    Roll,
    /// `income`
    IncomeAmount,
}

impl RecordField {
    /// JSON key for the attribute.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Roll => "roll",
            Self::IncomeAmount => "income",
        }
    }

    /// Resolve a sort property.
    #[must_use]
    pub fn from_property(property: &str) -> Option<Self> {
        match property {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "roll" => Some(Self::Roll),
            "income" | "incomeAmount" => Some(Self::IncomeAmount),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Identity and merge behaviour.

    use super::*;
    use rstest::rstest;

    fn stored() -> Record {
        Record::new()
            .with_id(1)
            .with_name("AAAAAAAAAA")
            .with_roll("AAAAAAAAAA")
            .with_income_amount(1)
    }

    #[rstest]
    #[case(Some(1), Some(1), true)]
    #[case(Some(1), Some(2), false)]
    #[case(Some(1), None, false)]
    #[case(None, Some(1), false)]
    #[case(None, None, false)]
    fn equality_follows_persisted_identity(
        #[case] left: Option<i64>,
        #[case] right: Option<i64>,
        #[case] expected: bool,
    ) {
        let a = Record { id: left, ..Record::default() };
        let b = Record { id: right, ..Record::default() };
        assert_eq!(a == b, expected);
    }

    #[rstest]
    fn unsaved_record_equals_itself() {
        let draft = Record::new().with_name("x");
        let same = &draft;
        assert!(draft == *same);
        assert!(draft != draft.clone());
    }

    #[rstest]
    fn merge_keeps_untouched_fields() {
        let mut record = stored();
        record.merge(&RecordPatch {
            name: None,
            roll: Some("BBBBBBBBBB".into()),
            income_amount: Some(2),
        });

        assert_eq!(record.id, Some(1));
        assert_eq!(record.name.as_deref(), Some("AAAAAAAAAA"));
        assert_eq!(record.roll.as_deref(), Some("BBBBBBBBBB"));
        assert_eq!(record.income_amount, Some(2));
    }

    #[rstest]
    fn merge_with_every_field_replaces_all_attributes() {
        let mut record = stored();
        record.merge(&RecordPatch {
            name: Some("BBBBBBBBBB".into()),
            roll: Some("BBBBBBBBBB".into()),
            income_amount: Some(2),
        });

        assert_eq!(record.id, Some(1));
        assert_eq!(record.name.as_deref(), Some("BBBBBBBBBB"));
        assert_eq!(record.roll.as_deref(), Some("BBBBBBBBBB"));
        assert_eq!(record.income_amount, Some(2));
    }

    #[rstest]
    fn patch_from_record_drops_the_id() {
        let patch = RecordPatch::from(stored());
        assert_eq!(patch.income_amount, Some(1));
        assert!(!patch.is_empty());
        assert!(RecordPatch::default().is_empty());
    }

    #[rstest]
    fn amount_uses_the_income_json_key() {
        let value = serde_json::to_value(stored()).expect("serialise record");
        assert_eq!(value["income"], serde_json::json!(1));
        assert!(value.get("incomeAmount").is_none());

        let parsed: Record =
            serde_json::from_value(serde_json::json!({"roll": "r", "income": 5}))
                .expect("parse record");
        assert_eq!(parsed.income_amount, Some(5));
        assert_eq!(parsed.id, None);
    }

    #[rstest]
    #[case("id", Some(RecordField::Id))]
    #[case("income", Some(RecordField::IncomeAmount))]
    #[case("incomeAmount", Some(RecordField::IncomeAmount))]
    #[case("salary", None)]
    fn resolves_sort_properties(#[case] property: &str, #[case] expected: Option<RecordField>) {
        assert_eq!(RecordField::from_property(property), expected);
    }
}
