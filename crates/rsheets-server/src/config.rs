//! Configuration management for the rsheets server.
//!
//! Configuration is assembled from three sources, later ones winning:
//! 1. Default values (hardcoded)
//! 2. Configuration file (YAML)
//! 3. Environment variables (override)
//!
//! Environment variables are prefixed with `RSHEETS_` and use `__` as the
//! nested key separator, e.g. `RSHEETS_SERVER__PORT=9090` overrides
//! `server.port`.

use std::collections::HashMap;
use std::path::Path;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ServerConfig {
    /// Server settings
    #[serde(default)]
    pub server: ServerSettings,

    /// Upstream spreadsheet service settings
    #[serde(default)]
    pub upstream: UpstreamSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Symbolic spreadsheet names: alias -> spreadsheet identifier.
    ///
    /// Requests may then address a spreadsheet by alias instead of its raw
    /// identifier.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

/// Server network settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ServerSettings {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

/// Upstream spreadsheet service settings.
///
/// - `RSHEETS_UPSTREAM__BACKEND=memory` - Serve from in-memory spreadsheets
/// - `RSHEETS_UPSTREAM__BASE_URL=...` - Point at a different endpoint
/// - `RSHEETS_UPSTREAM__AUTH_TOKEN=...` - Bearer token for upstream calls
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct UpstreamSettings {
    /// Upstream backend type: "rest" or "memory"
    #[serde(default = "default_upstream_backend")]
    pub backend: String,

    /// Base URL of the upstream service (used by the "rest" backend)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token attached to upstream requests, when set
    pub auth_token: Option<String>,

    /// Upstream request timeout in seconds
    #[serde(default = "default_upstream_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            backend: default_upstream_backend(),
            base_url: default_base_url(),
            auth_token: None,
            request_timeout_secs: default_upstream_timeout(),
        }
    }
}

fn default_upstream_backend() -> String {
    "rest".to_string()
}

fn default_base_url() -> String {
    "https://sheets.googleapis.com".to_string()
}

fn default_upstream_timeout() -> u64 {
    30
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Use JSON format (true for production, false for development)
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl ServerConfig {
    /// Load configuration from a YAML file with environment variable
    /// overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigLoadError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let config = Config::builder()
            .add_source(Config::try_from(&ServerConfig::default())?)
            .add_source(File::from(path).format(FileFormat::Yaml))
            .add_source(
                Environment::with_prefix("RSHEETS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let server_config: ServerConfig = config.try_deserialize()?;
        server_config.validate()?;

        Ok(server_config)
    }

    /// Load configuration from environment variables only.
    ///
    /// Uses default values and allows overrides via RSHEETS_ prefixed env
    /// vars.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        let config = Config::builder()
            .add_source(Config::try_from(&ServerConfig::default())?)
            .add_source(
                Environment::with_prefix("RSHEETS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let server_config: ServerConfig = config.try_deserialize()?;
        server_config.validate()?;

        Ok(server_config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.server.port == 0 {
            return Err(ConfigLoadError::Invalid {
                message: "server.port must be greater than 0".to_string(),
            });
        }

        let valid_backends = ["rest", "memory"];
        if !valid_backends.contains(&self.upstream.backend.as_str()) {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "upstream.backend must be one of: {:?}, got: {}",
                    valid_backends, self.upstream.backend
                ),
            });
        }

        if self.upstream.backend == "rest" && self.upstream.base_url.trim().is_empty() {
            return Err(ConfigLoadError::Invalid {
                message: "upstream.base_url is required when backend is 'rest'".to_string(),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "logging.level must be one of: {:?}, got: {}",
                    valid_levels, self.logging.level
                ),
            });
        }

        for (alias, id) in &self.aliases {
            if alias.trim().is_empty() || id.trim().is_empty() {
                return Err(ConfigLoadError::Invalid {
                    message: format!("aliases entries must be non-empty, got: {alias:?} -> {id:?}"),
                });
            }
        }

        Ok(())
    }
}
