//! Decode error types

use thiserror::Error;

/// Reasons a broker message cannot become a StatusEvent
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Topic '{topic}' does not start with '{prefix}'")]
    MissingPrefix { topic: String, prefix: &'static str },

    #[error("Invalid entity id '{raw}': {source}")]
    InvalidId {
        raw: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("Invalid status code '{raw}': {source}")]
    InvalidCode {
        raw: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("Unsupported payload version {0}")]
    UnsupportedVersion(u32),

    #[error("Invalid payload envelope: {0}")]
    InvalidEnvelope(#[from] serde_json::Error),
}
