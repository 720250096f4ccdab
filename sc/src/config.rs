//! statuscast configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::codec::PayloadFormat;
use crate::coordinator::CoordinatorConfig;

/// Main statuscast configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Broker connection
    pub broker: BrokerConfig,

    /// Wire encoding
    pub wire: WireConfig,

    /// Coordinator channels and delivery policy
    pub coordinator: CoordinatorConfig,
}

impl Config {
    /// Validate configuration before use
    pub fn validate(&self) -> Result<()> {
        if self.broker.url.is_empty() {
            return Err(eyre::eyre!("broker url must not be empty"));
        }
        self.coordinator.validate()
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .statuscast.yml
        let local_config = PathBuf::from(".statuscast.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/statuscast/statuscast.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("statuscast").join("statuscast.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read just the log level, before logging is set up
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load(config_path).ok().and_then(|config| config.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Broker connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// Redis connection URL
    pub url: String,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379/0".to_string(),
        }
    }
}

/// Wire encoding configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WireConfig {
    /// Payload encoding used when publishing (decoding accepts both)
    #[serde(rename = "payload-format")]
    pub payload_format: PayloadFormat,
}
