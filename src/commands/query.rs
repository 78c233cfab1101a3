//! The list command.

use crate::args::ListArgs;
use crate::commands::{transactions_noun, Out};
use crate::model::{Amount, Transaction, DATE_FORMAT};
use crate::{Config, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt::Write;

/// Everything `list` shows, for callers that want the data rather than the text.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    transactions: Vec<Transaction>,
    total: Amount,
    budget_cap: Option<f64>,
    over_budget: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    converted_total: Option<String>,
}

impl Listing {
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn total(&self) -> Amount {
        self.total
    }

    pub fn over_budget(&self) -> bool {
        self.over_budget
    }

    pub fn converted_total(&self) -> Option<&str> {
        self.converted_total.as_deref()
    }
}

/// Lists the stored transactions in the order they were saved, followed by their total and how
/// it compares to the budget cap.
///
/// Unreadable storage is logged and listed as empty.
///
/// # Errors
///
/// - Returns an error if `args` names a currency without a stored rate.
pub fn list(config: Config, args: ListArgs) -> Result<Out<Listing>> {
    let store = config.store()?;
    let transactions = store.load_transactions();
    let settings = store.load_settings();
    let currency = args.currency().map(str::to_ascii_uppercase);

    let total = Amount::new(transactions.iter().map(|t| t.amount().value()).sum::<Decimal>());
    let mut message = String::new();
    for t in &transactions {
        let _ = write!(
            message,
            "{}  {:<14} {:<24} {:>12}  {}",
            t.date().format(DATE_FORMAT),
            t.category(),
            t.description(),
            t.amount().formatted(),
            t.id()
        );
        if let Some(code) = &currency {
            let converted = settings.convert(t.amount(), code)?;
            let _ = write!(message, "  ({} {})", Amount::new(converted).formatted(), code);
        }
        message.push('\n');
    }
    let _ = write!(
        message,
        "Total: {} ({})",
        total.formatted(),
        transactions_noun(transactions.len())
    );

    let converted_total = match &currency {
        Some(code) => {
            let converted = Amount::new(settings.convert(total, code)?).formatted();
            let _ = write!(message, ", {converted} {code}");
            Some(converted)
        }
        None => None,
    };

    let total_f64 = total.value().to_f64().unwrap_or_default();
    let over_budget = settings.budget_cap().is_some_and(|cap| total_f64 > cap);
    if let Some(cap) = settings.budget_cap() {
        let cap_text = format_num::format_num!(",.2", cap);
        if over_budget {
            let over = format_num::format_num!(",.2", total_f64 - cap);
            let _ = write!(message, "\nOver the budget cap of {cap_text} by {over}");
        } else {
            let left = format_num::format_num!(",.2", cap - total_f64);
            let _ = write!(message, "\nBudget cap {cap_text}, {left} remaining");
        }
    }

    let listing = Listing {
        transactions,
        total,
        budget_cap: settings.budget_cap(),
        over_budget,
        currency,
        converted_total,
    };
    Ok(Out::new(message, listing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Settings;
    use crate::test::{test_transaction, TestEnv};
    use std::str::FromStr;

    #[test]
    fn test_list_empty() {
        let env = TestEnv::new();
        let out = list(env.config(), ListArgs::default()).unwrap();
        assert_eq!(out.message(), "Total: 0.00 (0 transactions)");
        let listing = out.structure().unwrap();
        assert!(listing.transactions().is_empty());
        assert!(!listing.over_budget());
    }

    #[test]
    fn test_list_total_and_budget() {
        let env = TestEnv::new();
        env.insert_transactions(&[
            test_transaction("txn_1", "Rent", "1200"),
            test_transaction("txn_2", "Coffee", "3.50"),
        ]);
        let mut settings = Settings::default();
        settings.set_budget_cap(Some(1000.0));
        env.config().store().unwrap().save_settings(&settings).unwrap();

        let out = list(env.config(), ListArgs::default()).unwrap();
        let listing = out.structure().unwrap();
        assert_eq!(listing.total(), Amount::from_str("1203.5").unwrap());
        assert!(listing.over_budget());
        assert!(out.message().contains("Total: 1,203.50 (2 transactions)"));
        assert!(out
            .message()
            .contains("Over the budget cap of 1,000.00 by 203.50"));
        assert_eq!(listing.transactions()[0].id(), "txn_1");
    }

    #[test]
    fn test_list_converted() {
        let env = TestEnv::new();
        env.insert_transactions(&[test_transaction("txn_1", "Book", "10")]);
        let out = list(env.config(), ListArgs::new(Some("eur".to_string()))).unwrap();
        assert_eq!(out.structure().unwrap().converted_total(), Some("8.50"));
        assert!(out.message().contains("(8.50 EUR)"));
    }

    #[test]
    fn test_list_unknown_currency() {
        let env = TestEnv::new();
        env.insert_transactions(&[test_transaction("txn_1", "Book", "10")]);
        let err = list(env.config(), ListArgs::new(Some("XYZ".to_string()))).unwrap_err();
        assert!(err.to_string().contains("No currency rate stored for 'XYZ'"));
    }

    #[test]
    fn test_list_corrupt_storage_is_empty() {
        let env = TestEnv::new();
        let config = env.config();
        let storage = r#"{"financeTracker:transactions": "not json"}"#;
        crate::utils::write(config.storage_path(), storage).unwrap();
        let out = list(config, ListArgs::default()).unwrap();
        assert!(out.structure().unwrap().transactions().is_empty());
    }

    #[test]
    fn test_list_unparseable_storage_file_is_empty() {
        let env = TestEnv::new();
        let config = env.config();
        crate::utils::write(config.storage_path(), "not json at all").unwrap();
        let out = list(config.clone(), ListArgs::default()).unwrap();
        assert!(out.structure().unwrap().transactions().is_empty());
        assert_eq!(out.message(), "Total: 0.00 (0 transactions)");
        assert_eq!(
            std::fs::read_to_string(config.storage_path()).unwrap(),
            "not json at all"
        );
    }
}
