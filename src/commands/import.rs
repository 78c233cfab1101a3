//! The import command.

use crate::args::ImportArgs;
use crate::commands::{transactions_noun, Out};
use crate::model::TransactionField;
use crate::store::{import_transactions, read_import_file};
use crate::validate::RawTransaction;
use crate::{Config, Result};
use anyhow::Context;
use tracing::warn;

/// Replaces the stored transactions with the ones in `args.file()`.
///
/// The import is all-or-nothing. The file must hold an array in which every element carries the
/// required fields, reads as a transaction and has an ID of its own, otherwise nothing is changed. Field rules are not
/// enforced on import, but records that break them are reported as warnings.
///
/// # Errors
///
/// - Returns an error if the file cannot be read or parsed, or fails the structural check.
/// - Returns an error if the transactions cannot be saved.
pub fn import(config: Config, args: ImportArgs) -> Result<Out<usize>> {
    let data = read_import_file(args.file())?;
    let transactions = import_transactions(&data)
        .with_context(|| format!("Unable to import '{}'", args.file().display()))?;

    let validator = config.validator();
    for t in &transactions {
        let mut raw = RawTransaction::default();
        for field in TransactionField::ALL {
            raw.set(field, t.field_value(field));
        }
        let errors = validator.validate_transaction(&raw);
        if !errors.is_empty() {
            warn!("Imported transaction {} does not pass validation: {errors}", t.id());
        }
    }

    let mut store = config.store()?;
    store
        .save_transactions(&transactions)
        .context("Unable to save the imported transactions")?;
    Ok(Out::new(
        format!("Imported {}", transactions_noun(transactions.len())),
        transactions.len(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{test_transaction, TestEnv};
    use crate::utils;

    #[test]
    fn test_import_replaces_transactions() {
        let env = TestEnv::new();
        env.insert_transactions(&[test_transaction("old", "Old", "1")]);
        let file = env.scratch().join("import.json");
        let json = r#"[
            {"id": "1", "description": "x", "amount": 0, "category": "Food", "date": "2024-01-01"},
            {"id": "2", "description": "Lunch", "amount": 12.5, "category": "Food",
             "date": "2024-01-02", "createdAt": "2024-01-02T12:00:00Z",
             "updatedAt": "2024-01-02T12:00:00Z"}
        ]"#;
        utils::write(&file, json).unwrap();

        let out = import(env.config(), ImportArgs::new(&file)).unwrap();
        assert_eq!(out.message(), "Imported 2 transactions");
        assert_eq!(out.structure(), Some(&2));

        let stored = env.transactions();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].id(), "1");
        assert_eq!(stored[1].description(), "Lunch");
    }

    #[test]
    fn test_import_invalid_leaves_transactions() {
        let env = TestEnv::new();
        let existing = vec![test_transaction("old", "Old", "1")];
        env.insert_transactions(&existing);
        let file = env.scratch().join("import.json");
        utils::write(&file, r#"[{"description": "x"}]"#).unwrap();

        let err = import(env.config(), ImportArgs::new(&file)).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("Invalid transaction at index 0: missing required fields"));
        assert_eq!(env.transactions(), existing);
    }

    #[test]
    fn test_import_not_an_array() {
        let env = TestEnv::new();
        let file = env.scratch().join("import.json");
        utils::write(&file, r#"{"transactions": []}"#).unwrap();
        let err = import(env.config(), ImportArgs::new(&file)).unwrap_err();
        assert!(format!("{err:#}").contains("Data must be an array"));
    }

    #[test]
    fn test_import_duplicate_ids_leaves_transactions() {
        let env = TestEnv::new();
        let existing = vec![test_transaction("old", "Old", "1")];
        env.insert_transactions(&existing);
        let file = env.scratch().join("import.json");
        let json = r#"[
            {"id": "a", "description": "x", "amount": 1, "category": "Food", "date": "2024-01-01"},
            {"id": "a", "description": "y", "amount": 2, "category": "Food", "date": "2024-01-02"}
        ]"#;
        utils::write(&file, json).unwrap();

        let err = import(env.config(), ImportArgs::new(&file)).unwrap_err();
        assert!(format!("{err:#}").contains("duplicate id 'a'"));
        assert_eq!(env.transactions(), existing);
    }

    #[test]
    fn test_import_missing_file() {
        let env = TestEnv::new();
        let file = env.scratch().join("missing.json");
        assert!(import(env.config(), ImportArgs::new(&file)).is_err());
    }
}
