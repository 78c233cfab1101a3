//! Configuration file handling for the finance tracker.
//!
//! The configuration file is stored at `$FINANCE_TRACKER_HOME/config.json` and selects the
//! validation rules, where the storage file and exports live, and the storage quota.

use crate::store::{FileStore, Store, DEFAULT_QUOTA_BYTES};
use crate::validate::{Validator, ValidatorVariant};
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "finance-tracker";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const STORAGE_JSON: &str = "storage.json";
const EXPORTS: &str = "exports";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to the home directory and from there it loads `config.json`. It provides paths to
/// the other items that are either configurable or expected in a certain location within the
/// home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory, the exports directory and an initial `config.json` that uses
    /// `variant`. An existing storage file is left alone, so running this again only rewrites the
    /// configuration.
    ///
    /// # Errors
    /// - Returns an error if any file operations fail.
    pub fn create(dir: impl Into<PathBuf>, variant: ValidatorVariant) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative).context("Unable to create the home directory")?;
        let root = utils::canonicalize(&maybe_relative)?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile {
            variant,
            ..ConfigFile::default()
        };
        config_file.save(&config_path)?;

        let config = Self {
            root,
            config_path,
            config_file,
        };
        utils::make_dir(&config.exports())?;
        Ok(config)
    }

    /// This will
    /// - validate that the home directory and the config file exist
    /// - load the config file
    /// - return the loaded configuration object
    pub fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        if !maybe_relative.is_dir() {
            bail!(
                "The home directory is missing '{}', run init first",
                maybe_relative.display()
            )
        }
        let root = utils::canonicalize(&maybe_relative)?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path)?;
        debug!("Loaded {}", config_path.display());

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn variant(&self) -> ValidatorVariant {
        self.config_file.variant
    }

    /// The path of the storage file, `storage.json` in the home directory unless configured.
    pub fn storage_path(&self) -> PathBuf {
        self.resolve(self.config_file.storage_path.as_deref(), STORAGE_JSON)
    }

    /// The directory exports are written to, `exports` in the home directory unless configured.
    pub fn exports(&self) -> PathBuf {
        self.resolve(self.config_file.exports_path.as_deref(), EXPORTS)
    }

    pub fn quota_bytes(&self) -> usize {
        self.config_file.quota_bytes.unwrap_or(DEFAULT_QUOTA_BYTES)
    }

    /// A validator for the configured variant, using today's date.
    pub fn validator(&self) -> Validator {
        Validator::new(self.variant())
    }

    /// Opens the storage file.
    pub fn store(&self) -> Result<Store<FileStore>> {
        let kv = FileStore::open(self.storage_path(), Some(self.quota_bytes()))?;
        Ok(Store::new(kv))
    }

    /// Returns `p` if it is absolute, resolves it against the home directory if it is relative,
    /// and falls back to `default` inside the home directory.
    fn resolve(&self, p: Option<&Path>, default: &str) -> PathBuf {
        match p {
            Some(p) if p.is_absolute() => p.to_path_buf(),
            Some(p) => self.root.join(p),
            None => self.root.join(default),
        }
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "finance-tracker",
///   "config_version": 1,
///   "variant": "strict",
///   "storage_path": "storage.json",
///   "exports_path": "/home/me/Documents/exports",
///   "quota_bytes": 5242880
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "finance-tracker"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Which validation rules the form uses
    #[serde(default)]
    variant: ValidatorVariant,

    /// Path to the storage file (optional, relative to the home directory or absolute)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    storage_path: Option<PathBuf>,

    /// Directory for exports (optional, relative to the home directory or absolute)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exports_path: Option<PathBuf>,

    /// Size limit of the storage file in bytes, defaults to 5 MiB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    quota_bytes: Option<usize>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            variant: ValidatorVariant::default(),
            storage_path: None,
            exports_path: None,
            quota_bytes: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or was written by another app or
    /// config version.
    fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).context("Unable to load config file")?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version == CONFIG_VERSION,
            "Unsupported config_version in config file: expected {}, got {}",
            CONFIG_VERSION,
            config.config_version
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data).context("Unable to write config file")
    }
}
