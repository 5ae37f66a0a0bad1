//! Configuration loading, validation, and management for AFKWarden.
//!
//! Loads configuration from `afkwarden.toml` in the working directory with
//! environment variable overrides. When no file exists, a default one is
//! written so operators have something to edit. Validates all settings at
//! startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The root configuration structure.
///
/// Maps directly to `afkwarden.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Presence agent settings
    #[serde(default)]
    pub agent: AgentConfig,

    /// Gateway (status page + live transport) settings
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Activity log settings
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Username the agent presents to the remote service
    #[serde(default = "default_username")]
    pub username: String,

    /// Remote server address (host:port)
    #[serde(default = "default_server")]
    pub server: String,
}

fn default_username() -> String {
    "AFKWarden".into()
}
fn default_server() -> String {
    "localhost:25565".into()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            server: default_server(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Bind address for the HTTP gateway
    #[serde(default = "default_host")]
    pub host: String,

    /// Port for the status page and live transport
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8080
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// How many recent entries are retained for dashboard replay
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,
}

fn default_buffer_capacity() -> usize {
    100
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: default_buffer_capacity(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to write config at {path}: {reason}")]
    WriteError { path: PathBuf, reason: String },

    #[error("Failed to parse config at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl AppConfig {
    /// Load configuration from the default path (`./afkwarden.toml`).
    ///
    /// Environment variable overrides, applied after the file:
    /// - `AFKWARDEN_USERNAME`
    /// - `AFKWARDEN_GATEWAY_PORT`
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::default_path())?;

        if let Ok(username) = std::env::var("AFKWARDEN_USERNAME") {
            config.agent.username = username;
        }

        if let Ok(port) = std::env::var("AFKWARDEN_GATEWAY_PORT") {
            match port.parse() {
                Ok(port) => config.gateway.port = port,
                Err(_) => {
                    return Err(ConfigError::ValidationError(format!(
                        "AFKWARDEN_GATEWAY_PORT is not a valid port: {port}"
                    )));
                }
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    ///
    /// A missing file is not an error: the defaults are written to that
    /// path (best effort) and returned.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "No config file found, creating defaults");
            let config = Self::default();
            if let Err(e) = config.write_to(path) {
                tracing::warn!(error = %e, "Could not write default config, continuing with defaults");
            }
            return Ok(config);
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML file.
    pub fn write_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// The default config file location.
    pub fn default_path() -> PathBuf {
        PathBuf::from("afkwarden.toml")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.gateway.port == 0 {
            return Err(ConfigError::ValidationError(
                "gateway.port must be non-zero".into(),
            ));
        }

        if self.log.buffer_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "log.buffer_capacity must be at least 1".into(),
            ));
        }

        if self.agent.username.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "agent.username must not be empty".into(),
            ));
        }

        Ok(())
    }
}
