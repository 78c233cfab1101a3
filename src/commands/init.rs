use crate::commands::Out;
use crate::validate::ValidatorVariant;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory, its exports directory and an initial `config.json` that selects
/// `variant`.
///
/// # Arguments
/// - `home` - The directory that will be the root of data directory, e.g.
///   `$HOME/finance-tracker`
/// - `variant` - The validation rules the form uses.
///
/// # Errors
/// - Returns an error if any file operations fail.
pub fn init(home: &Path, variant: ValidatorVariant) -> Result<Out<()>> {
    let config = Config::create(home, variant)
        .context("Unable to create the data directory and config")?;
    Ok(format!(
        "Successfully created the finance-tracker directory at {} using the {} rules",
        config.root().display(),
        variant
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");
        let out = init(&home, ValidatorVariant::Lenient).unwrap();
        assert!(out.message().contains("lenient"));
        assert!(out.structure().is_none());
        let config = Config::load(&home).unwrap();
        assert_eq!(config.variant(), ValidatorVariant::Lenient);
    }
}
