//! Main Coordinator task implementation

use std::time::Duration;

use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::config::CoordinatorConfig;
use super::delivery::deliver;
use super::error::CoordinatorError;
use super::handle::CoordinatorHandle;
use super::messages::{CoordRequest, CoordinatorMetrics};
use super::registry::{Registry, Subscription};
use crate::broker::{EventSource, MessageStream, RawMessage};
use crate::codec::{self, TOPIC_PATTERN};

/// The Coordinator owns the subscription registry and fans out broker events
pub struct Coordinator {
    config: CoordinatorConfig,
    tx: mpsc::Sender<CoordRequest>,
    rx: mpsc::Receiver<CoordRequest>,
}

impl Coordinator {
    /// Create a new Coordinator with the given configuration
    pub fn new(config: CoordinatorConfig) -> Self {
        debug!(?config, "Coordinator::new: called");
        let (tx, rx) = mpsc::channel(config.request_buffer);
        Self { config, tx, rx }
    }

    /// Create a handle for subscribing
    pub fn handle(&self) -> CoordinatorHandle {
        CoordinatorHandle::new(self.tx.clone(), self.config.sink_capacity)
    }

    /// Run the Coordinator task
    ///
    /// Subscribes to every status topic on `source` and waits for the broker
    /// to confirm before serving any request. An unconfirmed subscription is
    /// returned as [`CoordinatorError::Confirmation`]; callers should treat it
    /// as fatal. Otherwise this only returns once the broker feed ends.
    pub async fn run<S: EventSource>(self, source: S) -> Result<(), CoordinatorError> {
        let feed = source
            .psubscribe(TOPIC_PATTERN)
            .await
            .map_err(|source| CoordinatorError::Confirmation {
                pattern: TOPIC_PATTERN.to_string(),
                source,
            })?;

        // The feed is independent of the source from here on
        drop(source);

        self.serve(feed).await
    }

    async fn serve(self, mut feed: MessageStream) -> Result<(), CoordinatorError> {
        let Self { config, tx, mut rx } = self;
        drop(tx);

        let (unsubscribe_tx, mut unsubscribe_rx) = mpsc::channel(config.unsubscribe_buffer);
        let mut state = LoopState {
            registry: Registry::new(),
            metrics: CoordinatorMetrics::default(),
            unsubscribe_tx,
            delivery_timeout: config.delivery_timeout(),
        };
        let mut requests_open = true;

        info!("Coordinator started");

        loop {
            tokio::select! {
                req = rx.recv(), if requests_open => match req {
                    Some(req) => state.handle_request(req),
                    None => {
                        debug!("All coordinator handles dropped");
                        requests_open = false;
                    }
                },

                // Never None: the loop holds a sender
                Some(id) = unsubscribe_rx.recv() => state.unregister(&id),

                msg = feed.next() => match msg {
                    Some(raw) => state.handle_message(raw),
                    None => {
                        warn!("Broker feed closed");
                        info!("Coordinator stopped");
                        return Err(CoordinatorError::FeedClosed);
                    }
                },
            }
        }
    }
}

/// State owned by the control loop
struct LoopState {
    registry: Registry,
    metrics: CoordinatorMetrics,
    unsubscribe_tx: mpsc::Sender<String>,
    delivery_timeout: Option<Duration>,
}

impl LoopState {
    fn handle_request(&mut self, req: CoordRequest) {
        match req {
            CoordRequest::Register { subscription, ack } => {
                self.register(subscription);
                // Caller may have given up waiting
                let _ = ack.send(());
            }

            CoordRequest::GetMetrics { reply_tx } => {
                let _ = reply_tx.send(self.metrics.clone());
            }
        }
    }

    fn register(&mut self, subscription: Subscription) {
        info!(id = %subscription.id, "Adding subscription");
        self.registry.register(subscription);
        self.metrics.active_subscriptions = self.registry.len();
    }

    fn unregister(&mut self, id: &str) {
        if self.registry.unregister(id) {
            info!(%id, "Removed subscription");
            self.metrics.unsubscribes += 1;
            self.metrics.active_subscriptions = self.registry.len();
        } else {
            debug!(%id, "Subscription already removed");
        }
    }

    fn handle_message(&mut self, raw: RawMessage) {
        self.metrics.messages_received += 1;

        let event = match codec::decode(&raw.topic, &raw.payload) {
            Ok(event) => event,
            Err(e) => {
                warn!(topic = %raw.topic, payload = %raw.payload, error = %e, "Dropping malformed broker message");
                self.metrics.malformed_messages += 1;
                return;
            }
        };

        debug!(id = event.id, code = event.code, "Received status event");
        self.metrics.events_dispatched += 1;

        for subscription in self.registry.iter() {
            tokio::spawn(deliver(
                subscription.clone(),
                event,
                self.unsubscribe_tx.clone(),
                self.delivery_timeout,
            ));
            self.metrics.deliveries_spawned += 1;
        }
    }
}
