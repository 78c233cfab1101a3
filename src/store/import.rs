use crate::model::{Transaction, AMOUNT_KEY, CATEGORY_KEY, DATE_KEY, DESCRIPTION_KEY, ID_KEY};
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

/// The outcome of the structural check on imported data.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct ImportValidation {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ImportValidation {
    fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Keys that must hold a non-empty value.
const FILLED_KEYS: [&str; 4] = [ID_KEY, DESCRIPTION_KEY, CATEGORY_KEY, DATE_KEY];

/// Checks that `data` has the shape of a transaction list before it is accepted:
/// - `data` must be an array
/// - every element must be an object with a non-empty `id`, `description`, `category` and `date`
/// - every element must have an `amount` key; its value is not inspected, so `0` passes
///
/// Field rules such as the amount format are not applied here. The error names the first
/// offending index.
pub fn validate_imported_data(data: &Value) -> ImportValidation {
    let Some(items) = data.as_array() else {
        return ImportValidation::invalid("Data must be an array");
    };
    for (i, item) in items.iter().enumerate() {
        let complete = match item.as_object() {
            Some(object) => {
                FILLED_KEYS
                    .iter()
                    .all(|key| object.get(*key).is_some_and(is_filled))
                    && object.contains_key(AMOUNT_KEY)
            }
            None => false,
        };
        if !complete {
            return ImportValidation::invalid(format!(
                "Invalid transaction at index {i}: missing required fields"
            ));
        }
    }
    ImportValidation::ok()
}

/// Empty strings, `null`, `false` and zero count as missing.
fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Converts imported JSON into transactions. The batch is all-or-nothing: the structural check
/// runs first, then any element that cannot be read as a `Transaction` or repeats an earlier ID
/// rejects the whole import.
pub fn import_transactions(data: &Value) -> Result<Vec<Transaction>> {
    let validation = validate_imported_data(data);
    if let Some(error) = validation.error() {
        bail!("{error}");
    }
    let items = data.as_array().map(Vec::as_slice).unwrap_or_default();
    let mut ids = HashSet::new();
    let mut transactions = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let transaction = Transaction::deserialize(item)
            .with_context(|| format!("Invalid transaction at index {i}"))?;
        if !ids.insert(transaction.id().to_string()) {
            bail!(
                "Invalid transaction at index {i}: duplicate id '{}'",
                transaction.id()
            );
        }
        transactions.push(transaction);
    }
    Ok(transactions)
}

/// Reads a JSON file chosen for import.
pub fn read_import_file(path: &Path) -> Result<Value> {
    utils::deserialize(path).context("Unable to read the import file")
}
