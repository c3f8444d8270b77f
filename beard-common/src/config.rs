//! Configuration loading and server URL resolution
//!
//! The Beard server base URL is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`BEARD_SERVER_URL`)
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing default config file is not an error; the console starts with
//! compiled defaults. A config file named explicitly on the command line
//! must exist and parse.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Compiled default for the Beard server base URL
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Environment variable overriding the server URL
pub const SERVER_URL_ENV: &str = "BEARD_SERVER_URL";

/// Bootstrap configuration as stored in the TOML file
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    /// Base URL of the Beard server (e.g. `http://localhost:5000`)
    #[serde(default)]
    pub server_url: Option<String>,

    /// Per-request timeout in seconds; absent or 0 means no timeout
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Fully resolved console configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    /// Base URL without trailing slash
    pub server_url: String,
    /// `None` leaves requests unbounded
    pub request_timeout: Option<Duration>,
    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout: None,
            log_level: default_log_level(),
        }
    }
}

/// Resolves [`ConsoleConfig`] from CLI, environment, TOML and defaults
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    cli_server_url: Option<String>,
    config_file: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Server URL given on the command line
    pub fn with_cli_server_url(mut self, url: Option<String>) -> Self {
        self.cli_server_url = url;
        self
    }

    /// Explicit config file; replaces the platform default lookup
    pub fn with_config_file(mut self, path: Option<PathBuf>) -> Self {
        self.config_file = path;
        self
    }

    /// Resolve the configuration
    pub fn resolve(&self) -> Result<ConsoleConfig> {
        let toml_config = self.load_toml()?;

        // Priority 1: command-line argument
        // Priority 2: environment variable
        // Priority 3: TOML config file
        // Priority 4: compiled default
        let server_url = if let Some(url) = &self.cli_server_url {
            url.clone()
        } else if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            url
        } else if let Some(url) = toml_config.server_url.clone() {
            url
        } else {
            DEFAULT_SERVER_URL.to_string()
        };

        let server_url = normalize_server_url(&server_url)?;

        let request_timeout = toml_config
            .request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(ConsoleConfig {
            server_url,
            request_timeout,
            log_level: toml_config.logging.level,
        })
    }

    fn load_toml(&self) -> Result<TomlConfig> {
        if let Some(path) = &self.config_file {
            // Explicit file: failures are fatal
            return load_toml_config(path);
        }

        let Some(path) = default_config_path() else {
            return Ok(TomlConfig::default());
        };

        match load_toml_config(&path) {
            Ok(config) => {
                info!("Loaded console config from {}", path.display());
                Ok(config)
            }
            Err(e) => {
                warn!("Ignoring config file {}: {}", path.display(), e);
                Ok(TomlConfig::default())
            }
        }
    }
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str::<TomlConfig>(&content)?;
    Ok(config)
}

/// Locate the platform config file, if one exists
///
/// Linux checks `~/.config/beard/console.toml` then `/etc/beard/console.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("beard").join("console.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/beard/console.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Validate the scheme and strip trailing slashes
pub fn normalize_server_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');

    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(Error::Config(format!(
            "Server URL must start with http:// or https://: {:?}",
            url
        )));
    }

    Ok(trimmed.to_string())
}
