//! In-process broker over a tokio broadcast channel

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use super::error::BrokerError;
use super::traits::{EventSource, MessageStream, Publisher, RawMessage};

/// Default channel capacity (messages)
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// In-memory broker with glob-style pattern subscriptions
///
/// Clones share the same channel. Subscription streams end once every clone
/// of the broker has been dropped.
#[derive(Clone)]
pub struct MemoryBroker {
    tx: broadcast::Sender<RawMessage>,
}

impl MemoryBroker {
    /// Create a new broker with the given capacity
    pub fn new(capacity: usize) -> Self {
        debug!(capacity, "MemoryBroker::new: called");
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Number of live pattern subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for MemoryBroker {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

#[async_trait]
impl EventSource for MemoryBroker {
    async fn psubscribe(&self, pattern: &str) -> Result<MessageStream, BrokerError> {
        debug!(%pattern, "MemoryBroker::psubscribe: called");
        let matcher = glob::Pattern::new(pattern).map_err(|e| BrokerError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        // Subscribed as soon as the receiver exists
        let rx = self.tx.subscribe();

        let stream = futures::stream::unfold((rx, matcher), |(mut rx, matcher)| async move {
            loop {
                match rx.recv().await {
                    Ok(msg) => {
                        if matcher.matches(&msg.topic) {
                            return Some((msg, (rx, matcher)));
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "MemoryBroker subscriber lagged, messages lost");
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        });

        Ok(stream.boxed())
    }
}

#[async_trait]
impl Publisher for MemoryBroker {
    async fn publish(&self, topic: &str, payload: &str) -> Result<u64, BrokerError> {
        debug!(%topic, %payload, "MemoryBroker::publish: called");
        // No subscribers is not an error, matching Redis PUBLISH
        let receivers = self.tx.send(RawMessage::new(topic, payload)).unwrap_or(0);
        Ok(receivers as u64)
    }
}
