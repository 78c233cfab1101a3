use crate::model::Amount;
use crate::Result;
use anyhow::{bail, ensure};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// User preferences persisted next to the transactions.
///
/// Example:
/// ```json
/// {
///   "budgetCap": null,
///   "currencyRates": { "EUR": 0.85, "GBP": 0.73 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Optional spending cap, in the base currency.
    pub(crate) budget_cap: Option<f64>,

    /// Multipliers from the base currency to a three-letter currency code.
    pub(crate) currency_rates: BTreeMap<String, f64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            budget_cap: None,
            currency_rates: BTreeMap::from([("EUR".to_string(), 0.85), ("GBP".to_string(), 0.73)]),
        }
    }
}

impl Settings {
    pub fn budget_cap(&self) -> Option<f64> {
        self.budget_cap
    }

    pub fn set_budget_cap(&mut self, budget_cap: Option<f64>) {
        self.budget_cap = budget_cap;
    }

    pub fn currency_rates(&self) -> &BTreeMap<String, f64> {
        &self.currency_rates
    }

    /// Adds or replaces the rate for `code`. The code is upper-cased.
    pub fn set_rate(&mut self, code: impl AsRef<str>, rate: f64) {
        let _ = self
            .currency_rates
            .insert(code.as_ref().to_ascii_uppercase(), rate);
    }

    /// Checks the constraints that the persisted layout cannot express on its own:
    /// - the budget cap, when present, is a finite non-negative number
    /// - every currency code is three ASCII uppercase letters
    /// - every rate is finite and strictly positive
    pub fn validate(&self) -> Result<()> {
        if let Some(cap) = self.budget_cap {
            ensure!(
                cap.is_finite() && cap >= 0.0,
                "Budget cap must be a non-negative number, got {cap}"
            );
        }
        for (code, rate) in &self.currency_rates {
            ensure!(
                code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase()),
                "Currency code '{code}' must be three uppercase letters"
            );
            ensure!(
                rate.is_finite() && *rate > 0.0,
                "Rate for {code} must be a positive number, got {rate}"
            );
        }
        Ok(())
    }

    /// Converts `amount` using the stored static rate for `code`.
    pub fn convert(&self, amount: Amount, code: &str) -> Result<Decimal> {
        let Some(rate) = self.currency_rates.get(code) else {
            bail!("No currency rate stored for '{code}'")
        };
        let Ok(rate) = Decimal::from_str(&rate.to_string()) else {
            bail!("The rate for '{code}' is not a usable number")
        };
        Ok((amount.value() * rate).round_dp(2))
    }
}
