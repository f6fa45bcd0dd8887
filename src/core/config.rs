//! Application configuration management
//!
//! Settings come from an optional TOML file; the bearer credential comes from
//! the process environment. Both are resolved once at startup and handed to
//! the client explicitly.

use crate::core::constants::{
    DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT,
};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Completion endpoint settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            request_timeout: default_request_timeout(),
            api_key_env: default_api_key_env(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub api: ApiSettings,

    pub log_level: String,

    /// Bearer credential; empty when the environment variable is unset
    pub api_key: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api", &self.api)
            .field("log_level", &self.log_level)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl Config {
    /// Build configuration from parsed TOML settings and a key lookup
    ///
    /// `lookup` resolves environment variable names; it is called once, with
    /// the configured `api_key_env`.
    pub fn from_parts<F>(toml_config: TomlConfig, lookup: F) -> Result<Self>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        if toml_config.api.base_url.trim().is_empty() {
            bail!("api.base_url must not be empty");
        }
        if toml_config.api.model.trim().is_empty() {
            bail!("api.model must not be empty");
        }
        if toml_config.api.request_timeout == 0 {
            bail!("api.request_timeout must be greater than zero");
        }

        let api_key = lookup(&toml_config.api.api_key_env).unwrap_or_default();

        Ok(Config {
            api: toml_config.api,
            log_level: toml_config.logging.log_level,
            api_key,
        })
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed, or if a value is
    /// invalid.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let toml_config = read_toml(path.as_ref())?;
        Self::from_parts(toml_config, |name| std::env::var(name).ok())
    }

    /// Load configuration from the environment and an optional config file
    ///
    /// Reads `.env` if present, then `CONFIG_PATH` (default `config.toml`).
    /// A missing config file means defaults.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let path = Path::new(&config_path);
        let toml_config = if path.exists() {
            read_toml(path)?
        } else {
            TomlConfig::default()
        };

        Self::from_parts(toml_config, |name| std::env::var(name).ok())
    }
}

fn read_toml(path: &Path) -> Result<TomlConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
    toml::from_str(&content).context("Failed to parse TOML configuration")
}
