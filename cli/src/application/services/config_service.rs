//! Application service: configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, set_config_value};

/// Load configuration.
///
/// # Errors
///
/// Returns an error if the configuration file exists but cannot be parsed.
pub fn load_config(store: &impl ConfigStore) -> Result<AppConfig> {
    store.load()
}

/// Validate and persist a single `key = value` setting.
///
/// # Errors
///
/// Returns an error if the key or value is invalid, or the file cannot be
/// written.
pub fn set_config(store: &impl ConfigStore, key: &str, value: &str) -> Result<AppConfig> {
    let mut config = store.load()?;
    set_config_value(&mut config, key, value)?;
    store.save(&config)?;
    Ok(config)
}
