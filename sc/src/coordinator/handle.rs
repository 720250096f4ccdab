//! CoordinatorHandle - Client interface for subscribers

use eyre::Result;
use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use super::error::CoordinatorError;
use super::messages::{CoordRequest, CoordinatorMetrics};
use super::registry::Subscription;
use crate::domain::StatusEvent;

/// Lazily produced status events, ending when the subscriber cancels
pub type StatusStream = BoxStream<'static, StatusEvent>;

/// Handle for subscribing to the Coordinator
///
/// This handle is cloneable; every clone talks to the same Coordinator.
#[derive(Clone)]
pub struct CoordinatorHandle {
    /// Sender to the Coordinator task
    tx: mpsc::Sender<CoordRequest>,

    /// Slots in each new subscriber's sink
    sink_capacity: usize,
}

impl CoordinatorHandle {
    pub(crate) fn new(tx: mpsc::Sender<CoordRequest>, sink_capacity: usize) -> Self {
        debug!(sink_capacity, "CoordinatorHandle::new: called");
        Self { tx, sink_capacity }
    }

    /// Subscribe to every status event published from now on
    ///
    /// Returns once the Coordinator has registered the subscription. The
    /// stream ends when `cancel` fires; dropping it early also unsubscribes
    /// at the next dispatch.
    pub async fn subscribe(&self, cancel: CancellationToken) -> Result<StatusStream> {
        let id = Uuid::now_v7().to_string();
        debug!(%id, "CoordinatorHandle::subscribe: called");

        let (sink, rx) = mpsc::channel(self.sink_capacity);
        let (ack_tx, ack_rx) = oneshot::channel();

        self.tx
            .send(CoordRequest::Register {
                subscription: Subscription {
                    id,
                    sink,
                    cancel: cancel.clone(),
                },
                ack: ack_tx,
            })
            .await
            .map_err(|_| CoordinatorError::ChannelClosed)?;

        ack_rx.await.map_err(|_| CoordinatorError::ChannelClosed)?;

        let stream = futures::stream::unfold((rx, cancel), |(mut rx, cancel)| async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                event = rx.recv() => event.map(|event| (event, (rx, cancel))),
            }
        });

        Ok(stream.boxed())
    }

    /// Get current Coordinator metrics
    pub async fn metrics(&self) -> Result<CoordinatorMetrics> {
        debug!("CoordinatorHandle::metrics: called");
        let (reply_tx, reply_rx) = oneshot::channel();

        self.tx
            .send(CoordRequest::GetMetrics { reply_tx })
            .await
            .map_err(|_| CoordinatorError::ChannelClosed)?;

        let metrics = reply_rx.await.map_err(|_| CoordinatorError::ChannelClosed)?;
        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribe_fails_when_coordinator_gone() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let handle = CoordinatorHandle::new(tx, 1);

        let err = handle.subscribe(CancellationToken::new()).await.err().unwrap();
        assert!(err.to_string().contains("Coordinator channel closed"));
    }

    #[tokio::test]
    async fn test_subscribe_sends_fresh_ids() {
        let (tx, mut rx) = mpsc::channel(4);
        let handle = CoordinatorHandle::new(tx, 1);

        // Minimal stand-in for the control loop
        let acker = tokio::spawn(async move {
            let mut ids = Vec::new();
            while let Some(req) = rx.recv().await {
                if let CoordRequest::Register { subscription, ack } = req {
                    ids.push(subscription.id);
                    let _ = ack.send(());
                }
            }
            ids
        });

        let _a = handle.subscribe(CancellationToken::new()).await.unwrap();
        let _b = handle.subscribe(CancellationToken::new()).await.unwrap();
        drop(handle);

        let ids = acker.await.unwrap();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }

    #[tokio::test]
    async fn test_stream_ends_on_cancel() {
        let (tx, mut rx) = mpsc::channel(1);
        let handle = CoordinatorHandle::new(tx, 1);

        let sink = tokio::spawn(async move {
            match rx.recv().await {
                Some(CoordRequest::Register { subscription, ack }) => {
                    let _ = ack.send(());
                    subscription
                }
                _ => panic!("Expected Register"),
            }
        });

        let cancel = CancellationToken::new();
        let mut stream = handle.subscribe(cancel.clone()).await.unwrap();
        let subscription = sink.await.unwrap();

        subscription.sink.send(StatusEvent::new(1, 1)).await.unwrap();
        assert_eq!(stream.next().await, Some(StatusEvent::new(1, 1)));

        // Buffered but not yet consumed: cancellation still ends the stream
        subscription.sink.send(StatusEvent::new(1, 2)).await.unwrap();
        cancel.cancel();
        assert_eq!(stream.next().await, None);
    }
}
