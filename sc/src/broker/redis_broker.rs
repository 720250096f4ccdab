//! Redis broker adapter
//!
//! Subscriptions use a dedicated pub/sub connection per `psubscribe` call;
//! publishing and PING share a multiplexed `ConnectionManager`.

use async_trait::async_trait;
use futures::StreamExt;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info};

use super::error::BrokerError;
use super::traits::{EventSource, MessageStream, Publisher, RawMessage};

/// Redis implementation of EventSource and Publisher
#[derive(Clone)]
pub struct RedisBroker {
    client: Client,
    conn: ConnectionManager,
}

impl RedisBroker {
    /// Connect to Redis
    ///
    /// # Arguments
    /// * `url` - Redis connection URL (e.g., redis://localhost:6379/0)
    pub async fn connect(url: &str) -> Result<Self, BrokerError> {
        debug!(%url, "RedisBroker::connect: called");
        let client = Client::open(url)?;
        let conn = ConnectionManager::new(client.clone()).await?;

        info!(url = %url, "Connected to Redis");

        Ok(Self { client, conn })
    }

    /// Round-trip a PING to the server
    pub async fn ping(&self) -> Result<String, BrokerError> {
        debug!("RedisBroker::ping: called");
        let mut conn = self.conn.clone();
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(pong)
    }
}

#[async_trait]
impl EventSource for RedisBroker {
    async fn psubscribe(&self, pattern: &str) -> Result<MessageStream, BrokerError> {
        debug!(%pattern, "RedisBroker::psubscribe: called");
        let mut pubsub = self.client.get_async_pubsub().await?;

        // Resolves on the server's psubscribe reply
        pubsub.psubscribe(pattern).await?;
        info!(%pattern, "Redis pattern subscription confirmed");

        let stream = pubsub.into_on_message().map(|msg| RawMessage {
            topic: msg.get_channel_name().to_string(),
            payload: String::from_utf8_lossy(msg.get_payload_bytes()).into_owned(),
        });

        Ok(stream.boxed())
    }
}

#[async_trait]
impl Publisher for RedisBroker {
    async fn publish(&self, topic: &str, payload: &str) -> Result<u64, BrokerError> {
        debug!(%topic, %payload, "RedisBroker::publish: called");
        let mut conn = self.conn.clone();
        let receivers: u64 = conn.publish(topic, payload).await?;
        Ok(receivers)
    }
}
