use crate::model::{Transaction, DATE_FORMAT};
use crate::{utils, Result};
use anyhow::Context;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::info;

/// The name of an export file created on `date`, e.g. `finance-tracker-2024-06-10.json`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("finance-tracker-{}.json", date.format(DATE_FORMAT))
}

/// Serializes `transactions` as an indented JSON array.
pub fn transactions_to_json(transactions: &[Transaction]) -> Result<String> {
    serde_json::to_string_pretty(transactions).context("Failed to serialize transactions to JSON")
}

/// Writes `transactions` as indented JSON into `dir`, named after today's date. An export made
/// earlier on the same day is replaced.
///
/// Returns the path of the written file.
pub fn export_to_json(transactions: &[Transaction], dir: &Path) -> Result<PathBuf> {
    let json = transactions_to_json(transactions)?;
    let path = dir.join(export_file_name(utils::today()));
    utils::write(&path, json)?;
    info!(
        "Exported {} transaction{} to {}",
        transactions.len(),
        if transactions.len() == 1 { "" } else { "s" },
        path.display()
    );
    Ok(path)
}
