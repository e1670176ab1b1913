//! Configuration resolution for the terminal.
//!
//! Order: config file, then `FLOWREG_*` environment, then command-line
//! overrides. The result is validated before anything connects.

use anyhow::{Context, Result};
use flowreg_core::ConsoleConfig;
use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// `<config dir>/flowreg/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("flowreg").join("config.toml"))
}

/// `<data dir>/flowreg/store.json`, where the session token is kept when the
/// config does not name a store.
pub fn default_store_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("flowreg").join("store.json"))
}

/// Load the file configuration.
///
/// An explicit path must exist. A missing default file means defaults.
pub fn load_file(explicit: Option<&Path>) -> Result<ConsoleConfig> {
    if let Some(path) = explicit {
        return ConsoleConfig::load_from_file(path)
            .with_context(|| format!("loading config from {}", path.display()));
    }
    match default_config_path() {
        Some(path) if path.exists() => ConsoleConfig::load_from_file(&path)
            .with_context(|| format!("loading config from {}", path.display())),
        _ => Ok(ConsoleConfig::default()),
    }
}

/// Apply command-line overrides on top of file and environment settings.
pub fn apply_overrides(config: &mut ConsoleConfig, cli: &Cli) {
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if cli.no_store {
        config.store_path = None;
    } else if config.store_path.is_none() {
        config.store_path = default_store_path();
    }
    if cli.verbose {
        config.log_level = "debug".to_string();
    }
}

/// Resolve and validate the full configuration.
pub fn resolve(cli: &Cli) -> Result<ConsoleConfig> {
    let mut config = load_file(cli.config.as_deref())?;
    config
        .merge_with_env()
        .context("reading FLOWREG_* environment overrides")?;
    apply_overrides(&mut config, cli);
    config.validate().context("invalid configuration")?;
    Ok(config)
}
