//! Coordinator error types

use thiserror::Error;

use crate::broker::BrokerError;

/// Conditions that end the Coordinator or its handles
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("Broker did not confirm pattern subscription '{pattern}': {source}")]
    Confirmation {
        pattern: String,
        #[source]
        source: BrokerError,
    },

    #[error("Broker feed closed")]
    FeedClosed,

    #[error("Coordinator channel closed")]
    ChannelClosed,
}
