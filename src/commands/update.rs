//! The edit command.

use crate::args::EditArgs;
use crate::commands::Out;
use crate::form::{FormSession, LogView, SubmitOutcome};
use crate::model::{Transaction, TransactionField};
use crate::{Config, Result};
use anyhow::{bail, Context};

/// Edits a transaction by opening the form on it, replacing the fields given in `args` and
/// submitting. Fields that are not given keep their current value. The stored record is replaced
/// as a whole, keeping its ID and `createdAt`.
///
/// # Errors
///
/// - Returns an error if no transaction has the ID.
/// - Returns an error listing every invalid field if validation fails. Nothing is saved.
/// - Returns an error if the storage file cannot be read or written.
pub fn edit(config: Config, args: EditArgs) -> Result<Out<Transaction>> {
    let mut store = config.store()?;
    let Some(existing) = store
        .find_transaction(args.id())
        .context("Unable to read the stored transactions")?
    else {
        bail!("Transaction not found: '{}'", args.id())
    };

    let mut form = FormSession::new(LogView, config.validator());
    form.show(Some(&existing));
    for field in TransactionField::ALL {
        if let Some(value) = args.value(field) {
            form.set_value(field, value);
        }
    }

    match form.submit(&mut store)? {
        SubmitOutcome::Updated(transaction) | SubmitOutcome::Added(transaction) => Ok(Out::new(
            format!("Updated transaction {}", transaction.id()),
            transaction,
        )),
        SubmitOutcome::Invalid(errors) => bail!("The transaction was not updated. {errors}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Amount;
    use crate::test::{test_transaction, TestEnv};
    use std::str::FromStr;

    #[test]
    fn test_edit_transaction() {
        let env = TestEnv::new();
        let original = test_transaction("txn_1", "Coffee", "3.50");
        env.insert_transactions(&[original.clone(), test_transaction("txn_2", "Tea", "2")]);

        let args = EditArgs::new("txn_1").with(TransactionField::Amount, "4");
        let out = edit(env.config(), args).unwrap();
        assert_eq!(out.message(), "Updated transaction txn_1");

        let updated = out.structure().unwrap();
        assert_eq!(updated.amount(), Amount::from_str("4").unwrap());
        assert_eq!(updated.description(), "Coffee");
        assert_eq!(updated.created_at(), original.created_at());
        assert_ne!(updated.updated_at(), original.updated_at());

        let stored = env.transactions();
        assert_eq!(stored.len(), 2);
        assert_eq!(&stored[0], updated);
        assert_eq!(stored[1].description(), "Tea");
    }

    #[test]
    fn test_edit_not_found() {
        let env = TestEnv::new();
        let err = edit(env.config(), EditArgs::new("missing")).unwrap_err();
        assert!(err.to_string().contains("Transaction not found"));
    }

    #[test]
    fn test_edit_invalid_leaves_record() {
        let env = TestEnv::new();
        let original = test_transaction("txn_1", "Coffee", "3.50");
        env.insert_transactions(&[original.clone()]);

        let args = EditArgs::new("txn_1").with(TransactionField::Date, "2099-01-01");
        let err = edit(env.config(), args).unwrap_err();
        assert!(err.to_string().contains("Date cannot be in the future"));
        assert_eq!(env.transactions(), vec![original]);
    }
}
