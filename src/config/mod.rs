//! Configuration module for the dashboard client
//!
//! Provides layered configuration loading from files, environment variables,
//! and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`FLOWSENSE_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use flowsense::config::ClientConfig;
//!
//! // Load defaults
//! let config = ClientConfig::default();
//! assert_eq!(config.backend.base_url, "http://localhost:5000/api");
//!
//! // Parse from TOML
//! let toml = r#"
//! [backend]
//! base_url = "http://10.0.0.5:5000/api"
//! "#;
//! let config: ClientConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.backend.base_url, "http://10.0.0.5:5000/api");
//! ```

pub mod error;
pub mod logging;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Backend controller address settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the controller's REST API, including the `/api` prefix.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout_seconds: 5,
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Poll cadences for the two recurring fetches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Seconds between status poll ticks.
    pub status_interval_seconds: u64,
    /// Seconds between history poll ticks.
    pub history_interval_seconds: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            status_interval_seconds: 1,
            history_interval_seconds: 10,
        }
    }
}

impl PollConfig {
    pub fn status_interval(&self) -> Duration {
        Duration::from_secs(self.status_interval_seconds)
    }

    pub fn history_interval(&self) -> Duration {
        Duration::from_secs(self.history_interval_seconds)
    }
}

/// Unified configuration for the dashboard client.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend controller address
    pub backend: BackendConfig,
    /// Poll cadences
    pub poll: PollConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl ClientConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports FLOWSENSE_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(base_url) = std::env::var("FLOWSENSE_BASE_URL") {
            self.backend.base_url = base_url;
        }
        if let Ok(timeout) = std::env::var("FLOWSENSE_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.backend.timeout_seconds = t;
            }
        }
        if let Ok(level) = std::env::var("FLOWSENSE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("FLOWSENSE_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.base_url.is_empty() {
            return Err(ConfigError::Validation {
                field: "backend.base_url".to_string(),
                message: "base URL cannot be empty".to_string(),
            });
        }
        if !self.backend.base_url.starts_with("http://")
            && !self.backend.base_url.starts_with("https://")
        {
            return Err(ConfigError::Validation {
                field: "backend.base_url".to_string(),
                message: "base URL must start with http:// or https://".to_string(),
            });
        }
        if self.backend.timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "backend.timeout_seconds".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }
        if self.poll.status_interval_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "poll.status_interval_seconds".to_string(),
                message: "interval must be non-zero".to_string(),
            });
        }
        if self.poll.history_interval_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "poll.history_interval_seconds".to_string(),
                message: "interval must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}
