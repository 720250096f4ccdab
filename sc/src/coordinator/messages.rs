//! Message types for the Coordinator

use tokio::sync::oneshot;

use super::registry::Subscription;

/// Requests sent to the Coordinator task by handles
#[derive(Debug)]
pub enum CoordRequest {
    /// Register a subscription; `ack` fires once it is in the registry
    Register {
        subscription: Subscription,
        ack: oneshot::Sender<()>,
    },

    /// Get current metrics
    GetMetrics {
        reply_tx: oneshot::Sender<CoordinatorMetrics>,
    },
}

/// Coordinator metrics for observability
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoordinatorMetrics {
    pub active_subscriptions: usize,
    pub messages_received: u64,
    pub malformed_messages: u64,
    pub events_dispatched: u64,
    pub deliveries_spawned: u64,
    pub unsubscribes: u64,
}
