//! These structs provide the CLI interface for the finance-tracker CLI.

use crate::model::TransactionField;
use crate::validate::ValidatorVariant;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing::level_filters::LevelFilter;

/// finance-tracker: A command-line tool for keeping track of personal spending.
///
/// Transactions are entered through the same validated form the web version of the tracker
/// uses, and are kept in a local storage file. They can be exported to a dated JSON file and
/// imported back from one.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and initialize the configuration file.
    ///
    /// This is the first command you should run. By default the data directory is
    /// $HOME/finance-tracker, pass --home if you want it somewhere else.
    Init(InitArgs),
    /// Add a transaction.
    Add(AddArgs),
    /// Change a transaction. Fields you do not pass keep their current value.
    Edit(EditArgs),
    /// Delete a transaction.
    Delete(DeleteArgs),
    /// List all transactions and their total.
    List(ListArgs),
    /// Check a single field value against the validation rules without saving anything.
    Check(CheckArgs),
    /// Write all transactions to finance-tracker-YYYY-MM-DD.json.
    Export(ExportArgs),
    /// Replace all transactions with the contents of an exported JSON file.
    Import(ImportArgs),
    /// Show or change the budget cap and currency rates.
    Settings(SettingsArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for instructions.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where data and configuration are held. Defaults to ~/finance-tracker
    #[arg(long, env = "FINANCE_TRACKER_HOME", default_value_t = default_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// (Not shown): Args for the `finance-tracker init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The validation rules to use. `strict` only accepts categories made of letters, spaces and
    /// hyphens, `lenient` accepts any non-empty category.
    #[arg(long, value_enum, default_value_t = ValidatorVariant::Strict)]
    variant: ValidatorVariant,
}

impl InitArgs {
    pub fn new(variant: ValidatorVariant) -> Self {
        Self { variant }
    }

    pub fn variant(&self) -> ValidatorVariant {
        self.variant
    }
}

/// (Not shown): Args for the `finance-tracker add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// What the money was spent on, e.g. "Coffee shop".
    #[arg(long)]
    description: String,

    /// The amount, e.g. 12.50. At most two decimal places.
    #[arg(long)]
    amount: String,

    /// The category, e.g. Food.
    #[arg(long)]
    category: String,

    /// The date in YYYY-MM-DD format. Defaults to today.
    #[arg(long)]
    date: Option<String>,
}

impl AddArgs {
    pub fn new(
        description: impl Into<String>,
        amount: impl Into<String>,
        category: impl Into<String>,
        date: Option<String>,
    ) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
            category: category.into(),
            date,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

/// (Not shown): Args for the `finance-tracker edit` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct EditArgs {
    /// The ID of the transaction to change.
    id: String,

    /// A new description.
    #[arg(long)]
    description: Option<String>,

    /// A new amount.
    #[arg(long)]
    amount: Option<String>,

    /// A new category.
    #[arg(long)]
    category: Option<String>,

    /// A new date in YYYY-MM-DD format.
    #[arg(long)]
    date: Option<String>,
}

impl EditArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with(mut self, field: TransactionField, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match field {
            TransactionField::Description => self.description = value,
            TransactionField::Amount => self.amount = value,
            TransactionField::Category => self.category = value,
            TransactionField::Date => self.date = value,
        }
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The new value for `field`, if one was given.
    pub fn value(&self, field: TransactionField) -> Option<&str> {
        match field {
            TransactionField::Description => self.description.as_deref(),
            TransactionField::Amount => self.amount.as_deref(),
            TransactionField::Category => self.category.as_deref(),
            TransactionField::Date => self.date.as_deref(),
        }
    }
}

/// (Not shown): Args for the `finance-tracker delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The ID of the transaction to delete.
    id: String,
}

impl DeleteArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// (Not shown): Args for the `finance-tracker list` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ListArgs {
    /// Also show amounts converted with the stored rate for this currency code, e.g. EUR.
    #[arg(long)]
    currency: Option<String>,
}

impl ListArgs {
    pub fn new(currency: Option<String>) -> Self {
        Self { currency }
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }
}

/// (Not shown): Args for the `finance-tracker check` command.
#[derive(Debug, Parser, Clone)]
pub struct CheckArgs {
    /// The field to check: description, amount, category or date.
    field: TransactionField,

    /// The value to check.
    value: String,
}

impl CheckArgs {
    pub fn new(field: TransactionField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    pub fn field(&self) -> TransactionField {
        self.field
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// (Not shown): Args for the `finance-tracker export` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ExportArgs {
    /// The directory to write the export file to. Defaults to the configured exports directory.
    #[arg(long)]
    out: Option<PathBuf>,
}

impl ExportArgs {
    pub fn new(out: Option<PathBuf>) -> Self {
        Self { out }
    }

    pub fn out(&self) -> Option<&Path> {
        self.out.as_deref()
    }
}

/// (Not shown): Args for the `finance-tracker import` command.
#[derive(Debug, Parser, Clone)]
pub struct ImportArgs {
    /// A JSON file holding an array of transactions, such as one written by export.
    file: PathBuf,
}

impl ImportArgs {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }
}

/// (Not shown): Args for the `finance-tracker settings` command. Without any flags the current
/// settings are shown.
#[derive(Debug, Parser, Clone, Default)]
pub struct SettingsArgs {
    /// Set the budget cap.
    #[arg(long, conflicts_with = "clear_budget_cap")]
    budget_cap: Option<f64>,

    /// Remove the budget cap.
    #[arg(long)]
    clear_budget_cap: bool,

    /// Add or replace a currency rate, e.g. --rate JPY=150.25. Can be repeated.
    #[arg(long = "rate", value_name = "CODE=RATE")]
    rates: Vec<CurrencyRate>,
}

impl SettingsArgs {
    pub fn new(budget_cap: Option<f64>, clear_budget_cap: bool, rates: Vec<CurrencyRate>) -> Self {
        Self {
            budget_cap,
            clear_budget_cap,
            rates,
        }
    }

    pub fn budget_cap(&self) -> Option<f64> {
        self.budget_cap
    }

    pub fn clear_budget_cap(&self) -> bool {
        self.clear_budget_cap
    }

    pub fn rates(&self) -> &[CurrencyRate] {
        &self.rates
    }

    /// True when no change was requested.
    pub fn is_empty(&self) -> bool {
        self.budget_cap.is_none() && !self.clear_budget_cap && self.rates.is_empty()
    }
}

/// A `CODE=RATE` pair from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyRate {
    code: String,
    rate: f64,
}

impl CurrencyRate {
    pub fn new(code: impl Into<String>, rate: f64) -> Self {
        Self {
            code: code.into(),
            rate,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl FromStr for CurrencyRate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((code, rate)) = s.split_once('=') else {
            return Err(format!("Expected CODE=RATE, got '{s}'"));
        };
        let rate = rate
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("Invalid rate in '{s}': {e}"))?;
        Ok(Self::new(code.trim(), rate))
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("finance-tracker"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or FINANCE_TRACKER_HOME instead of relying on the default \
                home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("finance-tracker")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("finance-tracker").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_parse_add() {
        let args = parse(&[
            "--home",
            "/tmp/ft",
            "add",
            "--description",
            "Coffee shop",
            "--amount",
            "4.50",
            "--category",
            "Food",
        ]);
        assert_eq!(args.common().home().path(), Path::new("/tmp/ft"));
        let Command::Add(add) = args.command() else {
            panic!("expected add");
        };
        assert_eq!(add.description(), "Coffee shop");
        assert_eq!(add.date(), None);
    }

    #[test]
    fn test_parse_check() {
        let args = parse(&["check", "amount", "12.555"]);
        let Command::Check(check) = args.command() else {
            panic!("expected check");
        };
        assert_eq!(check.field(), TransactionField::Amount);
        assert_eq!(check.value(), "12.555");
    }

    #[test]
    fn test_parse_init_variant() {
        let args = parse(&["--log-level", "debug", "init", "--variant", "lenient"]);
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
        let Command::Init(init) = args.command() else {
            panic!("expected init");
        };
        assert_eq!(init.variant(), ValidatorVariant::Lenient);
    }

    #[test]
    fn test_parse_settings_rates() {
        let args = parse(&["settings", "--rate", "jpy=150.5", "--rate", "CHF=0.9"]);
        let Command::Settings(settings) = args.command() else {
            panic!("expected settings");
        };
        assert_eq!(
            settings.rates(),
            &[CurrencyRate::new("jpy", 150.5), CurrencyRate::new("CHF", 0.9)]
        );
        assert!(!settings.is_empty());
    }

    #[test]
    fn test_settings_budget_cap_conflict() {
        let result = Args::try_parse_from([
            "finance-tracker",
            "settings",
            "--budget-cap",
            "10",
            "--clear-budget-cap",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_currency_rate_from_str() {
        assert!(CurrencyRate::from_str("EUR").is_err());
        assert!(CurrencyRate::from_str("EUR=abc").is_err());
        assert_eq!(
            CurrencyRate::from_str(" EUR = 0.9 ").unwrap(),
            CurrencyRate::new("EUR", 0.9)
        );
    }
}
