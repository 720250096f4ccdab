//! Broker traits

use async_trait::async_trait;
use futures::stream::BoxStream;

use super::error::BrokerError;

/// A message as delivered by the broker, before decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    pub topic: String,
    pub payload: String,
}

impl RawMessage {
    pub fn new(topic: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }
}

/// Ordered feed of raw messages for a pattern subscription
pub type MessageStream = BoxStream<'static, RawMessage>;

/// Source of pattern-subscribed broker messages
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Subscribe to every topic matching `pattern`
    ///
    /// Returns only once the broker has confirmed the subscription, so every
    /// message published afterwards is observable on the stream. An error
    /// means the feed is unconfirmed.
    async fn psubscribe(&self, pattern: &str) -> Result<MessageStream, BrokerError>;
}

/// Sink for outgoing broker messages
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish `payload` on `topic`, returning the number of receivers the
    /// broker reported
    async fn publish(&self, topic: &str, payload: &str) -> Result<u64, BrokerError>;
}
