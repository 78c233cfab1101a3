//! The export command.

use crate::args::ExportArgs;
use crate::commands::{transactions_noun, Out};
use crate::store::export_to_json;
use crate::{utils, Config, Result};
use anyhow::Context;
use std::path::PathBuf;

/// Writes every stored transaction to `finance-tracker-YYYY-MM-DD.json` in the directory given
/// in `args`, or in the configured exports directory. The directory is created if needed.
///
/// # Errors
///
/// - Returns an error if the stored transactions cannot be read. An unreadable store is not
///   exported as an empty list.
/// - Returns an error if the file cannot be written.
pub fn export(config: Config, args: ExportArgs) -> Result<Out<PathBuf>> {
    let store = config.store()?;
    let transactions = store
        .try_load_transactions()
        .context("Unable to read the stored transactions")?;
    let dir = match args.out() {
        Some(dir) => dir.to_path_buf(),
        None => config.exports(),
    };
    utils::make_dir(&dir)?;
    let path = export_to_json(&transactions, &dir)?;
    Ok(Out::new(
        format!(
            "Exported {} to {}",
            transactions_noun(transactions.len()),
            path.display()
        ),
        path,
    ))
}
