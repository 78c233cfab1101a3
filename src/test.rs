//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::model::{Amount, Transaction, TransactionDraft};
use crate::validate::ValidatorVariant;
use crate::Config;
use chrono::{NaiveDate, TimeZone, Utc};
use std::path::Path;
use std::str::FromStr;
use tempfile::TempDir;

/// Test environment that sets up a home directory with a Config.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment using the strict rules.
    pub fn new() -> Self {
        Self::with_variant(ValidatorVariant::Strict)
    }

    pub fn with_variant(variant: ValidatorVariant) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("finance-tracker");
        let config = Config::create(&root, variant).unwrap();
        Self { temp_dir, config }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// A scratch directory outside the home directory.
    pub fn scratch(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Saves `transactions` directly, bypassing the form.
    pub fn insert_transactions(&self, transactions: &[Transaction]) {
        let mut store = self.config.store().unwrap();
        store.save_transactions(transactions).unwrap();
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.config.store().unwrap().try_load_transactions().unwrap()
    }
}

/// A valid transaction dated in the past.
pub fn test_transaction(id: &str, description: &str, amount: &str) -> Transaction {
    Transaction::create(
        id,
        TransactionDraft {
            description: description.to_string(),
            amount: Amount::from_str(amount).unwrap(),
            category: "Food".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        },
        Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap(),
    )
}
