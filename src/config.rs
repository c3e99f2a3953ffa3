//! Emulator configuration.
//!
//! Settings come from, in increasing priority: built-in defaults, a TOML
//! file, `DNSMOCK_*` environment variables and command-line flags (applied
//! by the binary).
//!
//! ```toml
//! bind_address = "127.0.0.1:4580"
//! name_servers = ["ns-1.example.net", "ns-2.example.net"]
//! default_max_items = 100
//!
//! [logging]
//! level = "debug"
//! json = false
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::{BackendConfig, DEFAULT_MAX_ITEMS, DEFAULT_NAME_SERVERS};

/// Address the binary listens on by default.
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:4580";

/// Overrides `bind_address`.
pub const ENV_BIND: &str = "DNSMOCK_BIND";
/// Overrides `logging.level`.
pub const ENV_LOG_LEVEL: &str = "DNSMOCK_LOG_LEVEL";
/// Overrides `logging.json`.
pub const ENV_JSON_LOGS: &str = "DNSMOCK_JSON_LOGS";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Errors raised while loading the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level applied to the crate's targets when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of the compact format.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Top-level emulator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmulatorConfig {
    /// Listen address; port 0 picks a free port.
    pub bind_address: SocketAddr,
    /// Delegation set returned for every hosted zone.
    pub name_servers: Vec<String>,
    /// Page size of listings that don't ask for one.
    pub default_max_items: usize,
    pub logging: LoggingConfig,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 4580)),
            name_servers: DEFAULT_NAME_SERVERS.iter().map(|ns| ns.to_string()).collect(),
            default_max_items: DEFAULT_MAX_ITEMS,
            logging: LoggingConfig::default(),
        }
    }
}

impl EmulatorConfig {
    /// Default configuration listening on a free loopback port.
    pub fn ephemeral() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 0)),
            ..Self::default()
        }
    }

    /// Parses a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Loads the file if one is given, then applies the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_env()
    }

    /// Applies the `DNSMOCK_*` environment variables.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides looked up by environment variable name.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup(ENV_BIND) {
            self.bind_address = bind.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_BIND,
                value: bind.clone(),
            })?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level.trim().to_ascii_lowercase();
        }
        if let Some(json) = lookup(ENV_JSON_LOGS) {
            self.logging.json = match json.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_JSON_LOGS,
                        value: json,
                    })
                }
            };
        }
        self.validate()?;
        Ok(self)
    }

    /// Checks values serde can't.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.level",
                value: self.logging.level.clone(),
            });
        }
        if self.default_max_items == 0 {
            return Err(ConfigError::InvalidValue {
                key: "default_max_items",
                value: "0".to_string(),
            });
        }
        if self.name_servers.iter().any(|ns| ns.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: "name_servers",
                value: self.name_servers.join(","),
            });
        }
        Ok(())
    }

    /// Settings handed to the backend.
    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            name_servers: self.name_servers.clone(),
            default_max_items: self.default_max_items,
        }
    }
}
