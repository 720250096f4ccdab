//! Coordinator configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Coordinator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Channel buffer size for subscribe/metrics requests
    #[serde(rename = "request-buffer", default = "default_request_buffer")]
    pub request_buffer: usize,

    /// Channel buffer size for unsubscribe reports from delivery tasks
    #[serde(rename = "unsubscribe-buffer", default = "default_unsubscribe_buffer")]
    pub unsubscribe_buffer: usize,

    /// Slots in each subscriber's sink (1 is the closest to a rendezvous)
    #[serde(rename = "sink-capacity", default = "default_sink_capacity")]
    pub sink_capacity: usize,

    /// Give up on a delivery after this many milliseconds (None waits forever)
    #[serde(rename = "delivery-timeout-ms", default)]
    pub delivery_timeout_ms: Option<u64>,
}

fn default_request_buffer() -> usize {
    debug!("default_request_buffer: called");
    1
}

fn default_unsubscribe_buffer() -> usize {
    debug!("default_unsubscribe_buffer: called");
    1
}

fn default_sink_capacity() -> usize {
    debug!("default_sink_capacity: called");
    1
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        debug!("CoordinatorConfig::default: called");
        Self {
            request_buffer: 1,
            unsubscribe_buffer: 1,
            sink_capacity: 1,
            delivery_timeout_ms: None,
        }
    }
}

impl CoordinatorConfig {
    /// Get the delivery deadline as a Duration
    pub fn delivery_timeout(&self) -> Option<Duration> {
        debug!(delivery_timeout_ms = ?self.delivery_timeout_ms, "CoordinatorConfig::delivery_timeout: called");
        self.delivery_timeout_ms.map(Duration::from_millis)
    }

    /// Reject values tokio channels cannot be built with
    pub fn validate(&self) -> eyre::Result<()> {
        if self.request_buffer == 0 {
            return Err(eyre::eyre!("coordinator request-buffer must be at least 1"));
        }
        if self.unsubscribe_buffer == 0 {
            return Err(eyre::eyre!("coordinator unsubscribe-buffer must be at least 1"));
        }
        if self.sink_capacity == 0 {
            return Err(eyre::eyre!("coordinator sink-capacity must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.request_buffer, 1);
        assert_eq!(config.unsubscribe_buffer, 1);
        assert_eq!(config.sink_capacity, 1);
        assert!(config.delivery_timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_delivery_timeout_duration() {
        let config = CoordinatorConfig {
            delivery_timeout_ms: Some(250),
            ..Default::default()
        };
        assert_eq!(config.delivery_timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_zero_sink_capacity_rejected() {
        let config = CoordinatorConfig {
            sink_capacity: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sink-capacity"));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: CoordinatorConfig = serde_yaml::from_str("delivery-timeout-ms: 500").unwrap();
        assert_eq!(config.delivery_timeout_ms, Some(500));
        assert_eq!(config.sink_capacity, 1);
        assert_eq!(config.request_buffer, 1);
    }
}
