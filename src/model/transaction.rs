use crate::model::Amount;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Represents a single financial entry as it is persisted and exported.
///
/// Example:
/// ```json
/// {
///   "id": "txn_1718000000000_k3j9x0a1b",
///   "description": "Coffee shop",
///   "amount": 4.5,
///   "category": "Food",
///   "date": "2024-06-10",
///   "createdAt": "2024-06-10T08:15:00Z",
///   "updatedAt": "2024-06-10T08:15:00Z"
/// }
/// ```
///
/// `createdAt` and `updatedAt` are optional when reading because imported files are only required
/// to carry the other five fields.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub(crate) id: String,
    pub(crate) description: String,
    pub(crate) amount: Amount,
    pub(crate) category: String,
    pub(crate) date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) updated_at: Option<DateTime<Utc>>,
}

/// The user-editable part of a `Transaction`, already validated.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TransactionDraft {
    pub description: String,
    pub amount: Amount,
    pub category: String,
    pub date: NaiveDate,
}

impl Transaction {
    /// Creates a brand-new transaction with `id` and sets both timestamps to `now`.
    pub fn create(id: impl Into<String>, draft: TransactionDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            description: draft.description,
            amount: draft.amount,
            category: draft.category,
            date: draft.date,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Builds the full replacement for `self`. The `id` and `createdAt` are carried over and
    /// `updatedAt` is refreshed to `now`.
    pub fn replace(&self, draft: TransactionDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id.clone(),
            description: draft.description,
            amount: draft.amount,
            category: draft.category,
            date: draft.date,
            created_at: self.created_at,
            updated_at: Some(now),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// The raw string the form would show for `field`.
    pub fn field_value(&self, field: TransactionField) -> String {
        match field {
            TransactionField::Description => self.description.clone(),
            TransactionField::Amount => self.amount.to_string(),
            TransactionField::Category => self.category.clone(),
            TransactionField::Date => self.date.format(DATE_FORMAT).to_string(),
        }
    }
}

/// The date layout used for transaction dates, exports and the date field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The user-editable fields of a transaction, in the order the form checks and focuses them.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionField {
    Description,
    Amount,
    Category,
    Date,
}

serde_plain::derive_display_from_serialize!(TransactionField);
serde_plain::derive_fromstr_from_deserialize!(TransactionField);

impl TransactionField {
    /// All fields, in form order.
    pub const ALL: [TransactionField; 4] = [
        TransactionField::Description,
        TransactionField::Amount,
        TransactionField::Category,
        TransactionField::Date,
    ];

    /// The key under which an imported record carries this field.
    pub fn json_key(&self) -> &'static str {
        match self {
            TransactionField::Description => DESCRIPTION_KEY,
            TransactionField::Amount => AMOUNT_KEY,
            TransactionField::Category => CATEGORY_KEY,
            TransactionField::Date => DATE_KEY,
        }
    }
}

pub(crate) const ID_KEY: &str = "id";
pub(crate) const DESCRIPTION_KEY: &str = "description";
pub(crate) const AMOUNT_KEY: &str = "amount";
pub(crate) const CATEGORY_KEY: &str = "category";
pub(crate) const DATE_KEY: &str = "date";
