//! Delivery task: hand one event to one subscriber
//!
//! Each task races the subscriber's sink against its cancellation token and
//! an optional deadline. Whichever resolves first decides the outcome; a
//! token that has already fired beats a free sink slot. A
//! cancelled or closed subscriber is reported to the Coordinator for
//! removal; delivery tasks never touch the registry themselves.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::registry::Subscription;
use crate::domain::StatusEvent;

/// How a single delivery attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The event was handed to the subscriber's sink
    Delivered,
    /// The subscriber's token fired first
    Cancelled,
    /// The subscriber dropped its stream
    Closed,
    /// The deadline passed with neither delivery nor cancellation
    TimedOut,
}

/// Deliver `event` to `subscription`, reporting cancelled subscribers on
/// `unsubscribe_tx`
pub async fn deliver(
    subscription: Subscription,
    event: StatusEvent,
    unsubscribe_tx: mpsc::Sender<String>,
    deadline: Option<Duration>,
) -> DeliveryOutcome {
    let outcome = tokio::select! {
        // A fired token beats a free sink slot
        biased;
        _ = subscription.cancel.cancelled() => DeliveryOutcome::Cancelled,
        permit = subscription.sink.reserve() => match permit {
            Ok(permit) => {
                permit.send(event);
                DeliveryOutcome::Delivered
            }
            Err(_) => DeliveryOutcome::Closed,
        },
        _ = expire(deadline) => DeliveryOutcome::TimedOut,
    };

    match outcome {
        DeliveryOutcome::Delivered => {
            debug!(id = %subscription.id, event_id = event.id, code = event.code, "Delivered status event");
        }
        DeliveryOutcome::Cancelled | DeliveryOutcome::Closed => {
            debug!(id = %subscription.id, ?outcome, "Subscriber gone, requesting unsubscribe");
            if unsubscribe_tx.send(subscription.id.clone()).await.is_err() {
                warn!(id = %subscription.id, "Coordinator gone, unsubscribe dropped");
            }
        }
        DeliveryOutcome::TimedOut => {
            warn!(
                id = %subscription.id,
                event_id = event.id,
                code = event.code,
                "Delivery deadline passed, event dropped for subscriber"
            );
        }
    }

    outcome
}

async fn expire(deadline: Option<Duration>) {
    match deadline {
        Some(deadline) => tokio::time::sleep(deadline).await,
        None => std::future::pending().await,
    }
}
