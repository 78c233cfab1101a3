//! The settings command.

use crate::args::SettingsArgs;
use crate::commands::Out;
use crate::model::Settings;
use crate::{Config, Result};
use anyhow::Context;

/// Shows the settings, or changes them when `args` asks for a change. Changes are checked with
/// `Settings::validate` and saved as a whole.
///
/// # Errors
///
/// - Returns an error if the changed settings are invalid. Nothing is saved.
/// - Returns an error if the settings cannot be saved.
pub fn settings(config: Config, args: SettingsArgs) -> Result<Out<Settings>> {
    let mut store = config.store()?;
    let mut settings = store.load_settings();
    if args.is_empty() {
        return Ok(Out::new(describe(&settings), settings));
    }

    if args.clear_budget_cap() {
        settings.set_budget_cap(None);
    }
    if let Some(cap) = args.budget_cap() {
        settings.set_budget_cap(Some(cap));
    }
    for rate in args.rates() {
        settings.set_rate(rate.code(), rate.rate());
    }
    settings.validate().context("The settings were not saved")?;
    store
        .save_settings(&settings)
        .context("Unable to save the settings")?;
    Ok(Out::new(
        format!("Saved settings. {}", describe(&settings)),
        settings,
    ))
}

/// e.g. `Budget cap: none. Currency rates: EUR 0.85, GBP 0.73`
fn describe(settings: &Settings) -> String {
    let cap = match settings.budget_cap() {
        Some(cap) => format_num::format_num!(",.2", cap),
        None => "none".to_string(),
    };
    let rates = settings
        .currency_rates()
        .iter()
        .map(|(code, rate)| format!("{code} {rate}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("Budget cap: {cap}. Currency rates: {rates}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::CurrencyRate;
    use crate::test::TestEnv;

    #[test]
    fn test_show_default_settings() {
        let env = TestEnv::new();
        let out = settings(env.config(), SettingsArgs::default()).unwrap();
        assert_eq!(
            out.message(),
            "Budget cap: none. Currency rates: EUR 0.85, GBP 0.73"
        );
        assert_eq!(out.structure(), Some(&Settings::default()));
        assert!(!env.config().storage_path().exists());
    }

    #[test]
    fn test_change_settings() {
        let env = TestEnv::new();
        let args = SettingsArgs::new(Some(2500.0), false, vec![CurrencyRate::new("jpy", 150.5)]);
        let out = settings(env.config(), args).unwrap();
        assert!(out.message().starts_with("Saved settings. Budget cap: 2,500.00."));

        let stored = env.config().store().unwrap().try_load_settings().unwrap();
        assert_eq!(stored.budget_cap(), Some(2500.0));
        assert_eq!(stored.currency_rates().get("JPY"), Some(&150.5));
        assert_eq!(stored.currency_rates().get("EUR"), Some(&0.85));

        let cleared = settings(env.config(), SettingsArgs::new(None, true, vec![])).unwrap();
        assert_eq!(cleared.structure().unwrap().budget_cap(), None);
    }

    #[test]
    fn test_invalid_settings_not_saved() {
        let env = TestEnv::new();
        let args = SettingsArgs::new(None, false, vec![CurrencyRate::new("EUR", -1.0)]);
        assert!(settings(env.config(), args).is_err());
        let stored = env.config().store().unwrap().try_load_settings().unwrap();
        assert_eq!(stored, Settings::default());
    }

    #[test]
    fn test_unparseable_storage_file() {
        let env = TestEnv::new();
        let config = env.config();
        crate::utils::write(config.storage_path(), "not json at all").unwrap();

        let out = settings(config.clone(), SettingsArgs::default()).unwrap();
        assert_eq!(out.structure(), Some(&Settings::default()));

        let args = SettingsArgs::new(Some(100.0), false, vec![]);
        let err = settings(config.clone(), args).unwrap_err();
        assert!(err.to_string().contains("Unable to save the settings"));
        assert_eq!(
            std::fs::read_to_string(config.storage_path()).unwrap(),
            "not json at all"
        );
    }
}
