//! The delete command.

use crate::args::DeleteArgs;
use crate::commands::Out;
use crate::{Config, Result};
use anyhow::{bail, Context};

/// Deletes the transaction with the given ID.
///
/// # Errors
///
/// - Returns an error if no transaction has the ID.
/// - Returns an error if the storage file cannot be read or written.
pub fn delete(config: Config, args: DeleteArgs) -> Result<Out<String>> {
    let mut store = config.store()?;
    let deleted = store
        .delete_transaction(args.id())
        .context("Unable to delete the transaction")?;
    if !deleted {
        bail!("Transaction not found: '{}'", args.id())
    }
    Ok(Out::new(
        format!("Deleted transaction {}", args.id()),
        args.id().to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{test_transaction, TestEnv};

    #[test]
    fn test_delete_transaction_success() {
        let env = TestEnv::new();
        env.insert_transactions(&[
            test_transaction("txn_1", "Coffee", "3"),
            test_transaction("txn_2", "Tea", "2"),
        ]);

        let out = delete(env.config(), DeleteArgs::new("txn_1")).unwrap();
        assert_eq!(out.message(), "Deleted transaction txn_1");
        assert_eq!(out.structure().unwrap(), "txn_1");

        let remaining = env.transactions();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id(), "txn_2");
    }

    #[test]
    fn test_delete_transaction_not_found_error() {
        let env = TestEnv::new();
        env.insert_transactions(&[test_transaction("txn_1", "Coffee", "3")]);

        let result = delete(env.config(), DeleteArgs::new("nonexistent-id"));
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Transaction not found"));
        assert_eq!(env.transactions().len(), 1);
    }

    #[test]
    fn test_delete_refuses_corrupt_storage() {
        let env = TestEnv::new();
        let config = env.config();
        let storage = r#"{"financeTracker:transactions": "{broken"}"#;
        crate::utils::write(config.storage_path(), storage).unwrap();

        let err = delete(config, DeleteArgs::new("txn_1")).unwrap_err();
        assert!(err.to_string().contains("Unable to delete the transaction"));
    }

    #[test]
    fn test_delete_leaves_unparseable_storage_file() {
        let env = TestEnv::new();
        let config = env.config();
        crate::utils::write(config.storage_path(), "not json at all").unwrap();

        assert!(delete(config.clone(), DeleteArgs::new("txn_1")).is_err());
        assert_eq!(
            std::fs::read_to_string(config.storage_path()).unwrap(),
            "not json at all"
        );
    }
}
