//! Subscription registry owned by the Coordinator loop

use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::domain::StatusEvent;

/// A subscriber's registered interest
///
/// Cloning produces the snapshot handed to a delivery task; the sink and
/// token are shared handles.
#[derive(Debug, Clone)]
pub struct Subscription {
    /// Globally unique subscription id
    pub id: String,

    /// Write side of the subscriber's event channel
    pub sink: mpsc::Sender<StatusEvent>,

    /// Caller-owned cancellation signal
    pub cancel: CancellationToken,
}

/// Active subscriptions keyed by id
///
/// Not synchronized: only the Coordinator loop touches it.
#[derive(Debug, Default)]
pub struct Registry {
    subscriptions: HashMap<String, Subscription>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a subscription; an existing entry with the same id is replaced
    pub fn register(&mut self, subscription: Subscription) {
        debug!(id = %subscription.id, "Registry::register: called");
        self.subscriptions.insert(subscription.id.clone(), subscription);
    }

    /// Remove a subscription, returning whether it was present
    pub fn unregister(&mut self, id: &str) -> bool {
        debug!(%id, "Registry::unregister: called");
        self.subscriptions.remove(id).is_some()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.subscriptions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Iterate the active subscriptions in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &Subscription> {
        self.subscriptions.values()
    }
}
