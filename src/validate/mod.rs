//! Field validators for transaction form input.
//!
//! Every check returns `None` when the value is acceptable, or a message meant to be shown next to
//! the field. Checks for one field run in a fixed order and stop at the first failure, so a field
//! never reports more than one message. `Validator::validate_transaction` runs all four fields
//! independently and collects their messages.

mod rules;

use crate::model::{Amount, TransactionDraft, TransactionField, DATE_FORMAT, MAX_AMOUNT};
use crate::utils;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

pub use rules::{
    has_duplicate_words, AMOUNT_PATTERN, CATEGORY_PATTERN, DATE_PATTERN, DESCRIPTION_PATTERN,
    DUPLICATE_WORDS_PATTERN,
};

/// Selects one of the two rule sets the tracker has shipped with.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ValidatorVariant {
    /// Categories must be letters separated by single spaces or hyphens.
    #[default]
    Strict,
    /// Any non-empty category is accepted. Messages are shorter.
    Lenient,
}

serde_plain::derive_display_from_serialize!(ValidatorVariant);
serde_plain::derive_fromstr_from_deserialize!(ValidatorVariant);

struct Messages {
    description_required: &'static str,
    description_spacing: &'static str,
    description_duplicate: &'static str,
    amount_required: &'static str,
    amount_format: &'static str,
    amount_negative: &'static str,
    amount_too_large: &'static str,
    date_required: &'static str,
    date_format: &'static str,
    date_invalid: &'static str,
    date_future: &'static str,
    category_required: &'static str,
    category_format: Option<&'static str>,
}

const STRICT: Messages = Messages {
    description_required: "Description is required",
    description_spacing: "Description cannot have leading/trailing spaces or double spaces",
    description_duplicate: "Description contains duplicate words (e.g., \"coffee coffee\")",
    amount_required: "Amount is required",
    amount_format: "Amount must be a valid number (e.g., 12.50 or 100)",
    amount_negative: "Amount cannot be negative",
    amount_too_large: "Amount seems too large. Please check.",
    date_required: "Date is required",
    date_format: "Date must be in YYYY-MM-DD format",
    date_invalid: "Please enter a valid date",
    date_future: "Date cannot be in the future",
    category_required: "Category is required",
    category_format: Some("Category can only contain letters, spaces, and hyphens"),
};

const LENIENT: Messages = Messages {
    description_required: "Description is required",
    description_spacing: "No leading/trailing spaces or double spaces allowed",
    description_duplicate: "Description contains duplicate words",
    amount_required: "Amount is required",
    amount_format: "Must be a valid number (e.g., 12.50)",
    amount_negative: "Cannot be negative",
    amount_too_large: "Amount too large",
    date_required: "Date is required",
    date_format: "Must be in YYYY-MM-DD format",
    date_invalid: "Invalid date",
    date_future: "Cannot be in the future",
    category_required: "Please select a category",
    category_format: None,
};

impl ValidatorVariant {
    fn messages(&self) -> &'static Messages {
        match self {
            ValidatorVariant::Strict => &STRICT,
            ValidatorVariant::Lenient => &LENIENT,
        }
    }
}

/// The raw, unparsed field values of a transaction form.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub description: String,
    pub amount: String,
    pub category: String,
    pub date: String,
}

impl RawTransaction {
    pub fn get(&self, field: TransactionField) -> &str {
        match field {
            TransactionField::Description => &self.description,
            TransactionField::Amount => &self.amount,
            TransactionField::Category => &self.category,
            TransactionField::Date => &self.date,
        }
    }

    pub fn set(&mut self, field: TransactionField, value: impl Into<String>) {
        let value = value.into();
        match field {
            TransactionField::Description => self.description = value,
            TransactionField::Amount => self.amount = value,
            TransactionField::Category => self.category = value,
            TransactionField::Date => self.date = value,
        }
    }
}

/// The messages of every invalid field, keyed by field. Iteration follows form order.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
pub struct FieldErrors(BTreeMap<TransactionField, &'static str>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: TransactionField) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    /// The first invalid field in form order, which is where focus should go.
    pub fn first(&self) -> Option<TransactionField> {
        self.0.keys().next().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TransactionField, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }

    fn insert(&mut self, field: TransactionField, message: Option<&'static str>) {
        if let Some(message) = message {
            let _ = self.0.insert(field, message);
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Applies one `ValidatorVariant` against a fixed notion of "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validator {
    variant: ValidatorVariant,
    today: NaiveDate,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidatorVariant::default())
    }
}

impl Validator {
    /// Creates a validator whose "today" is the current local date.
    pub fn new(variant: ValidatorVariant) -> Self {
        Self::with_today(variant, utils::today())
    }

    pub fn with_today(variant: ValidatorVariant, today: NaiveDate) -> Self {
        Self { variant, today }
    }

    pub fn variant(&self) -> ValidatorVariant {
        self.variant
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn validate_description(&self, value: &str) -> Option<&'static str> {
        let m = self.variant.messages();
        if value.trim().is_empty() {
            return Some(m.description_required);
        }
        if !rules::is_description(value) {
            return Some(m.description_spacing);
        }
        if rules::has_duplicate_words(value) {
            return Some(m.description_duplicate);
        }
        None
    }

    pub fn validate_amount(&self, value: &str) -> Option<&'static str> {
        let m = self.variant.messages();
        if value.trim().is_empty() {
            return Some(m.amount_required);
        }
        if !rules::is_amount(value) {
            return Some(m.amount_format);
        }
        let Ok(amount) = Amount::from_str(value) else {
            return Some(m.amount_format);
        };
        if amount.is_negative() {
            return Some(m.amount_negative);
        }
        if amount.value() > Decimal::from(MAX_AMOUNT) {
            return Some(m.amount_too_large);
        }
        None
    }

    pub fn validate_date(&self, value: &str) -> Option<&'static str> {
        let m = self.variant.messages();
        if value.trim().is_empty() {
            return Some(m.date_required);
        }
        if !rules::is_date(value) {
            return Some(m.date_format);
        }
        let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) else {
            return Some(m.date_invalid);
        };
        if date > self.today {
            return Some(m.date_future);
        }
        None
    }

    pub fn validate_category(&self, value: &str) -> Option<&'static str> {
        let m = self.variant.messages();
        if value.trim().is_empty() {
            return Some(m.category_required);
        }
        if let Some(message) = m.category_format {
            if !rules::is_category(value) {
                return Some(message);
            }
        }
        None
    }

    /// Runs the validator for `field`.
    pub fn validate_field(&self, field: TransactionField, value: &str) -> Option<&'static str> {
        match field {
            TransactionField::Description => self.validate_description(value),
            TransactionField::Amount => self.validate_amount(value),
            TransactionField::Category => self.validate_category(value),
            TransactionField::Date => self.validate_date(value),
        }
    }

    /// Runs every field validator and collects all failures.
    pub fn validate_transaction(&self, raw: &RawTransaction) -> FieldErrors {
        let mut errors = FieldErrors::default();
        for field in TransactionField::ALL {
            errors.insert(field, self.validate_field(field, raw.get(field)));
        }
        errors
    }

    /// Validates `raw` and, when every field passes, converts it into typed values. The
    /// description is trimmed.
    pub fn parse(&self, raw: &RawTransaction) -> Result<TransactionDraft, FieldErrors> {
        let errors = self.validate_transaction(raw);
        if !errors.is_empty() {
            return Err(errors);
        }
        let mut errors = FieldErrors::default();
        let m = self.variant.messages();
        let amount = Amount::from_str(&raw.amount).ok();
        let date = NaiveDate::parse_from_str(&raw.date, DATE_FORMAT).ok();
        if amount.is_none() {
            errors.insert(TransactionField::Amount, Some(m.amount_format));
        }
        if date.is_none() {
            errors.insert(TransactionField::Date, Some(m.date_invalid));
        }
        match (amount, date) {
            (Some(amount), Some(date)) => Ok(TransactionDraft {
                description: raw.description.trim().to_string(),
                amount,
                category: raw.category.clone(),
                date,
            }),
            _ => Err(errors),
        }
    }
}
