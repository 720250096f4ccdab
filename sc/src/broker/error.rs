//! Broker error types

use thiserror::Error;

/// Errors raised by broker adapters
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Invalid topic pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Broker closed")]
    Closed,
}

impl BrokerError {
    /// Check if the failure came from the connection rather than the request
    pub fn is_connection(&self) -> bool {
        match self {
            BrokerError::Redis(e) => e.is_io_error() || e.is_connection_dropped() || e.is_connection_refusal(),
            BrokerError::Closed => true,
            BrokerError::InvalidPattern { .. } => false,
        }
    }
}
