//! Publish path: status updates straight to the broker

use std::sync::Arc;

use eyre::{Context, Result};
use tracing::debug;

use crate::broker::Publisher;
use crate::codec::{PayloadFormat, encode_payload, topic_for};
use crate::domain::StatusEvent;

/// Writes status updates to the broker
///
/// A pure pass-through: no retries, no local state. Subscribers see the
/// update only once it comes back through the Coordinator's feed.
#[derive(Clone)]
pub struct StatusPublisher {
    publisher: Arc<dyn Publisher>,
    format: PayloadFormat,
}

impl StatusPublisher {
    pub fn new(publisher: Arc<dyn Publisher>, format: PayloadFormat) -> Self {
        debug!(?format, "StatusPublisher::new: called");
        Self { publisher, format }
    }

    /// Publish `code` as the new status of entity `id`
    pub async fn publish(&self, id: i32, code: i32) -> Result<StatusEvent> {
        let topic = topic_for(id);
        let payload = encode_payload(code, self.format);
        debug!(%topic, %payload, "StatusPublisher::publish: called");

        let receivers = self
            .publisher
            .publish(&topic, &payload)
            .await
            .context("could not publish status update")?;

        debug!(%topic, receivers, "Published status update");
        Ok(StatusEvent { id, code })
    }
}
