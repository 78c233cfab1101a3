//! Key-value backends that play the role of the browser's local storage.
//!
//! Values are strings. Both backends enforce an optional quota over the combined size of all keys
//! and values, and reject a write that would exceed it without changing anything.

use crate::{utils, Result};
use anyhow::{anyhow, Context};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// The usual per-origin local storage limit of browsers.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum KvError {
    #[error("Storage quota exceeded: {needed} bytes needed, the limit is {quota} bytes")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// A string-to-string store with single-key writes.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> std::result::Result<Option<String>, KvError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: String) -> std::result::Result<(), KvError>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> std::result::Result<(), KvError>;
}

/// Computes the size of `entries` after `key` is set to `value` and checks it against `quota`.
fn check_quota(
    entries: &BTreeMap<String, String>,
    key: &str,
    value: &str,
    quota: Option<usize>,
) -> std::result::Result<(), KvError> {
    let Some(quota) = quota else {
        return Ok(());
    };
    let current: usize = entries.iter().map(|(k, v)| k.len() + v.len()).sum();
    let replaced = entries.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
    let needed = current - replaced + key.len() + value.len();
    if needed > quota {
        return Err(KvError::QuotaExceeded { needed, quota });
    }
    Ok(())
}

/// Keeps everything in memory. Useful for tests and for callers that persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that refuses writes once the keys and values total more than `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            quota: Some(quota),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, KvError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> std::result::Result<(), KvError> {
        check_quota(&self.entries, key, &value, self.quota)?;
        let _ = self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> std::result::Result<(), KvError> {
        let _ = self.entries.remove(key);
        Ok(())
    }
}

/// Persists every key into a single JSON object on disk, e.g.
///
/// ```json
/// {
///   "financeTracker:settings": "{\"budgetCap\":null,\"currencyRates\":{\"EUR\":0.85}}",
///   "financeTracker:transactions": "[]"
/// }
/// ```
///
/// The whole file is rewritten on every `set`, through a temporary file and a rename.
///
/// A file that cannot be read or parsed does not stop the store from opening. Every `get`,
/// `set` and `remove` then fails with the open error, and the file is never overwritten.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
    corrupt: Option<String>,
}

impl FileStore {
    /// Opens the store at `path`, reading existing entries if the file exists. An unreadable
    /// file is logged and remembered rather than returned as an error here.
    pub fn open(path: impl Into<PathBuf>, quota: Option<usize>) -> Result<Self> {
        let path = path.into();
        let mut corrupt = None;
        let entries = if path.is_file() {
            match utils::deserialize(&path).context("Unable to open the storage file") {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("{e:#}");
                    corrupt = Some(format!("{e:#}"));
                    BTreeMap::new()
                }
            }
        } else {
            debug!("No storage file at {}, starting empty", path.display());
            BTreeMap::new()
        };
        Ok(Self {
            path,
            entries,
            quota,
            corrupt,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the file existed but could not be read as a storage file.
    pub fn is_corrupt(&self) -> bool {
        self.corrupt.is_some()
    }

    fn ensure_readable(&self) -> std::result::Result<(), KvError> {
        match &self.corrupt {
            Some(message) => Err(KvError::Backend(anyhow!("{message}"))),
            None => Ok(()),
        }
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let data =
            serde_json::to_string_pretty(entries).context("Unable to serialize storage entries")?;
        utils::write_atomic(&self.path, data)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, KvError> {
        self.ensure_readable()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> std::result::Result<(), KvError> {
        self.ensure_readable()?;
        check_quota(&self.entries, key, &value, self.quota)?;
        let mut next = self.entries.clone();
        let _ = next.insert(key.to_string(), value);
        self.flush(&next)?;
        trace!("Wrote '{key}' to {}", self.path.display());
        self.entries = next;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> std::result::Result<(), KvError> {
        self.ensure_readable()?;
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut next = self.entries.clone();
        let _ = next.remove(key);
        self.flush(&next)?;
        self.entries = next;
        Ok(())
    }
}
