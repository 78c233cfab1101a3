//! Types that represent the core data model, such as `Transaction` and `Settings`.
mod amount;
mod settings;
mod transaction;

pub use amount::{Amount, AmountError, MAX_AMOUNT};
pub use settings::Settings;
pub(crate) use transaction::{AMOUNT_KEY, CATEGORY_KEY, DATE_KEY, DESCRIPTION_KEY, ID_KEY};
pub use transaction::{Transaction, TransactionDraft, TransactionField, DATE_FORMAT};
