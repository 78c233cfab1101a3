//! The add command.

use crate::args::AddArgs;
use crate::commands::Out;
use crate::form::{FormSession, LogView, SubmitOutcome};
use crate::model::{Transaction, TransactionField};
use crate::{Config, Result};
use anyhow::bail;

/// Adds a transaction by filling in and submitting a new form.
///
/// The date defaults to today when `args` has none. A unique transaction ID is generated.
///
/// # Returns
///
/// On success, returns an `Out` containing:
/// - A message naming the generated ID.
/// - The saved `Transaction`.
///
/// # Errors
///
/// - Returns an error listing every invalid field if validation fails. Nothing is saved.
/// - Returns an error if the storage file cannot be read or written.
pub fn add(config: Config, args: AddArgs) -> Result<Out<Transaction>> {
    let mut store = config.store()?;
    let mut form = FormSession::new(LogView, config.validator());
    form.show(None);
    form.set_value(TransactionField::Description, args.description());
    form.set_value(TransactionField::Amount, args.amount());
    form.set_value(TransactionField::Category, args.category());
    if let Some(date) = args.date() {
        form.set_value(TransactionField::Date, date);
    }

    match form.submit(&mut store)? {
        SubmitOutcome::Added(transaction) | SubmitOutcome::Updated(transaction) => Ok(Out::new(
            format!("Added transaction {}", transaction.id()),
            transaction,
        )),
        SubmitOutcome::Invalid(errors) => bail!("The transaction was not added. {errors}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;
    use crate::utils;
    use crate::validate::ValidatorVariant;

    #[test]
    fn test_add_transaction() {
        let env = TestEnv::new();
        let args = AddArgs::new("Coffee shop", "4.50", "Food", None);
        let out = add(env.config(), args).unwrap();

        let added = out.structure().unwrap();
        assert!(added.id().starts_with("txn_"));
        assert!(out.message().contains(added.id()));
        assert_eq!(added.date(), utils::today());
        assert_eq!(env.transactions(), vec![added.clone()]);
    }

    #[test]
    fn test_add_with_date() {
        let env = TestEnv::new();
        let args = AddArgs::new("Rent", "1200", "Housing", Some("2025-01-01".to_string()));
        let out = add(env.config(), args).unwrap();
        let added = out.structure().unwrap();
        assert_eq!(added.field_value(TransactionField::Date), "2025-01-01");
        assert_eq!(added.amount().formatted(), "1,200.00");
    }

    #[test]
    fn test_add_invalid() {
        let env = TestEnv::new();
        let args = AddArgs::new("coffee coffee", "12.555", "Food", None);
        let err = add(env.config(), args).unwrap_err().to_string();
        assert!(err.contains("description: Description contains duplicate words"));
        assert!(err.contains("amount: Amount must be a valid number"));
        assert!(env.transactions().is_empty());
    }

    #[test]
    fn test_add_category_depends_on_variant() {
        let strict = TestEnv::new();
        let args = AddArgs::new("Dinner", "30", "Food & Drink", None);
        assert!(add(strict.config(), args.clone()).is_err());

        let lenient = TestEnv::with_variant(ValidatorVariant::Lenient);
        assert!(add(lenient.config(), args).is_ok());
        assert_eq!(lenient.transactions().len(), 1);
    }

    #[test]
    fn test_add_leaves_unparseable_storage_file() {
        let env = TestEnv::new();
        let config = env.config();
        utils::write(config.storage_path(), "not json at all").unwrap();

        let args = AddArgs::new("Coffee shop", "4.50", "Food", None);
        assert!(add(config.clone(), args).is_err());
        assert_eq!(
            std::fs::read_to_string(config.storage_path()).unwrap(),
            "not json at all"
        );
    }
}
