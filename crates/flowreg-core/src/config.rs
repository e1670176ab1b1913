//! Console configuration
//!
//! Loaded from TOML, then overlaid with `FLOWREG_*` environment variables,
//! then validated. Every field has a default so an empty file is valid.
//!
//! ```toml
//! base_url = "https://registry.example.com:18443"
//! store_path = "/home/alice/.config/flowreg/store.json"
//! request_timeout_secs = 30
//! log_level = "info"
//! buckets_permission_check = "present"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::types::BucketsPermissionCheck;

/// Base path of the registry REST API.
pub const DEFAULT_API_PATH: &str = "/nifi-registry-api";

/// Default registry location.
pub const DEFAULT_BASE_URL: &str = "http://localhost:18080";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "FLOWREG_";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("Failed to read config file {path}: {reason}")]
    Read {
        /// Path of the config file
        path: String,
        /// Underlying I/O error
        reason: String,
    },
    /// The config file is not valid TOML
    #[error("Invalid TOML: {0}")]
    Parse(String),
    /// A value failed validation
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue {
        /// Config key
        key: String,
        /// Why the value was rejected
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Settings shared by the client, the application core and the terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Scheme, host and port of the registry
    pub base_url: String,
    /// REST API base path appended to `base_url`
    pub api_path: String,
    /// File backing the local expiring store; in-memory when unset
    pub store_path: Option<PathBuf>,
    /// Per-request timeout
    pub request_timeout_secs: u64,
    /// Default tracing filter
    pub log_level: String,
    /// Post-resolution check used by the workflow-administration gate
    pub buckets_permission_check: BucketsPermissionCheck,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_path: DEFAULT_API_PATH.to_string(),
            store_path: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            log_level: "info".to_string(),
            buckets_permission_check: BucketsPermissionCheck::default(),
        }
    }
}

impl ConsoleConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Overlay `FLOWREG_*` variables from the process environment.
    pub fn merge_with_env(&mut self) -> Result<(), ConfigError> {
        self.merge_with_vars(std::env::vars())
    }

    /// Overlay `FLOWREG_*` variables from an explicit iterator.
    ///
    /// Unknown `FLOWREG_` keys are ignored.
    pub fn merge_with_vars<I>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match name {
                "BASE_URL" => self.base_url = value,
                "API_PATH" => self.api_path = value,
                "STORE_PATH" => self.store_path = Some(PathBuf::from(value)),
                "LOG_LEVEL" => self.log_level = value,
                "REQUEST_TIMEOUT_SECS" => {
                    self.request_timeout_secs = value
                        .parse()
                        .map_err(|_| ConfigError::invalid("request_timeout_secs", value))?;
                }
                "BUCKETS_PERMISSION_CHECK" => {
                    self.buckets_permission_check = value
                        .parse()
                        .map_err(|e: String| ConfigError::invalid("buckets_permission_check", e))?;
                }
                other => tracing::debug!(key = other, "ignoring unknown environment override"),
            }
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "base_url",
                "must start with http:// or https://",
            ));
        }
        if !self.api_path.starts_with('/') {
            return Err(ConfigError::invalid("api_path", "must start with '/'"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "request_timeout_secs",
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Full API root, e.g. `http://localhost:18080/nifi-registry-api`.
    pub fn api_base(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.api_path.trim_end_matches('/')
        )
    }
}
