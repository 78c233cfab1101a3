//! The persistence boundary for transactions and settings.
//!
//! The two collections live under fixed, independent keys of a `KeyValueStore`. Nothing here
//! re-validates transactions: callers validate before saving.
//!
//! Failures never escape as panics. The `try_*` loads return a `StoreError`; the plain loads log
//! it and fall back to the default value, and saves log and return the `StoreError`.

mod export;
mod import;
mod kv;

pub use export::{export_file_name, export_to_json, transactions_to_json};
pub use import::{import_transactions, read_import_file, validate_imported_data, ImportValidation};
pub use kv::{FileStore, KeyValueStore, KvError, MemoryStore, DEFAULT_QUOTA_BYTES};

use crate::model::{Settings, Transaction};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

/// The key holding the JSON array of transactions.
pub const TRANSACTIONS_KEY: &str = "financeTracker:transactions";

/// The key holding the JSON settings object.
pub const SETTINGS_KEY: &str = "financeTracker:settings";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Unable to read '{key}' from storage")]
    Read {
        key: &'static str,
        #[source]
        source: KvError,
    },

    #[error("The data stored under '{key}' could not be parsed")]
    Corrupt {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unable to serialize the data for '{key}'")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unable to write '{key}' to storage")]
    Write {
        key: &'static str,
        #[source]
        source: KvError,
    },
}

impl StoreError {
    /// True when the write was refused because the storage quota is used up.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(
            self,
            StoreError::Write {
                source: KvError::QuotaExceeded { .. },
                ..
            }
        )
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Loads and saves transactions and settings through a `KeyValueStore`.
#[derive(Debug, Clone, Default)]
pub struct Store<K> {
    kv: K,
}

impl<K> Store<K>
where
    K: KeyValueStore,
{
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    pub fn into_inner(self) -> K {
        self.kv
    }

    fn read<T>(&self, key: &'static str) -> StoreResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let Some(data) = self
            .kv
            .get(key)
            .map_err(|source| StoreError::Read { key, source })?
        else {
            debug!("Nothing stored under '{key}'");
            return Ok(None);
        };
        serde_json::from_str(&data)
            .map(Some)
            .map_err(|source| StoreError::Corrupt { key, source })
    }

    fn write<T>(&mut self, key: &'static str, value: &T) -> StoreResult<()>
    where
        T: Serialize + ?Sized,
    {
        let data =
            serde_json::to_string(value).map_err(|source| StoreError::Serialize { key, source })?;
        self.kv
            .set(key, data)
            .map_err(|source| StoreError::Write { key, source })
    }

    /// Returns the stored transactions, or an empty list when nothing has been stored yet.
    pub fn try_load_transactions(&self) -> StoreResult<Vec<Transaction>> {
        Ok(self.read(TRANSACTIONS_KEY)?.unwrap_or_default())
    }

    /// Returns the stored transactions. Read and parse failures are logged and produce an empty
    /// list.
    pub fn load_transactions(&self) -> Vec<Transaction> {
        self.try_load_transactions().unwrap_or_else(|e| {
            error!("Error loading transactions: {}", error_chain(&e));
            Vec::new()
        })
    }

    /// Overwrites the stored transactions with `transactions` in a single key write.
    pub fn save_transactions(&mut self, transactions: &[Transaction]) -> StoreResult<()> {
        self.write(TRANSACTIONS_KEY, transactions)
            .inspect_err(|e| error!("Error saving transactions: {}", error_chain(e)))
    }

    /// Returns the stored settings, or the defaults when nothing has been stored yet.
    pub fn try_load_settings(&self) -> StoreResult<Settings> {
        Ok(self.read(SETTINGS_KEY)?.unwrap_or_default())
    }

    /// Returns the stored settings. Read and parse failures are logged and produce the defaults.
    pub fn load_settings(&self) -> Settings {
        self.try_load_settings().unwrap_or_else(|e| {
            error!("Error loading settings: {}", error_chain(&e));
            Settings::default()
        })
    }

    /// Replaces the stored settings.
    pub fn save_settings(&mut self, settings: &Settings) -> StoreResult<()> {
        self.write(SETTINGS_KEY, settings)
            .inspect_err(|e| error!("Error saving settings: {}", error_chain(e)))
    }

    /// Returns the stored transaction with `id`.
    pub fn find_transaction(&self, id: &str) -> StoreResult<Option<Transaction>> {
        Ok(self
            .try_load_transactions()?
            .into_iter()
            .find(|t| t.id() == id))
    }

    /// Replaces the transaction with the same ID, or appends `transaction` if there is none.
    /// Returns `true` when an existing record was replaced.
    ///
    /// Unreadable stored data is reported rather than overwritten.
    pub fn upsert_transaction(&mut self, transaction: Transaction) -> StoreResult<bool> {
        let mut transactions = self.try_load_transactions()?;
        let replaced = match transactions.iter_mut().find(|t| t.id() == transaction.id()) {
            Some(existing) => {
                *existing = transaction;
                true
            }
            None => {
                transactions.push(transaction);
                false
            }
        };
        self.save_transactions(&transactions)?;
        Ok(replaced)
    }

    /// Replaces the stored transaction with the same ID. Returns `false`, and saves nothing, when
    /// there is no such transaction.
    pub fn replace_transaction(&mut self, transaction: Transaction) -> StoreResult<bool> {
        let mut transactions = self.try_load_transactions()?;
        let Some(existing) = transactions.iter_mut().find(|t| t.id() == transaction.id()) else {
            return Ok(false);
        };
        *existing = transaction;
        self.save_transactions(&transactions)?;
        Ok(true)
    }

    /// Removes the transaction with `id`. Returns `false` if there was no such transaction.
    pub fn delete_transaction(&mut self, id: &str) -> StoreResult<bool> {
        let mut transactions = self.try_load_transactions()?;
        let before = transactions.len();
        transactions.retain(|t| t.id() != id);
        if transactions.len() == before {
            return Ok(false);
        }
        self.save_transactions(&transactions)?;
        Ok(true)
    }
}

/// Formats an error with its sources, e.g. `outer: inner: root`.
fn error_chain(e: &(dyn std::error::Error + 'static)) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}
