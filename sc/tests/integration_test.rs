//! Integration tests for statuscast
//!
//! These tests drive publish -> broker -> Coordinator -> subscribers end to
//! end over the in-memory broker.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use statuscast::broker::{MemoryBroker, Publisher};
use statuscast::codec::PayloadFormat;
use statuscast::coordinator::{Coordinator, CoordinatorConfig, CoordinatorError, CoordinatorHandle};
use statuscast::{StatusEvent, StatusPublisher};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

fn start_coordinator(
    broker: &MemoryBroker,
    config: CoordinatorConfig,
) -> (CoordinatorHandle, JoinHandle<Result<(), CoordinatorError>>) {
    let coordinator = Coordinator::new(config);
    let handle = coordinator.handle();
    let task = tokio::spawn(coordinator.run(broker.clone()));
    (handle, task)
}

async fn next_event(stream: &mut statuscast::StatusStream) -> Option<StatusEvent> {
    tokio::time::timeout(Duration::from_secs(5), stream.next())
        .await
        .expect("Timed out waiting for status event")
}

// =============================================================================
// Publish -> Subscribe
// =============================================================================

#[tokio::test]
async fn test_published_status_reaches_every_subscriber() {
    let broker = MemoryBroker::default();
    let (handle, _task) = start_coordinator(&broker, CoordinatorConfig::default());
    let publisher = StatusPublisher::new(Arc::new(broker.clone()), PayloadFormat::Text);

    let mut first = handle.subscribe(CancellationToken::new()).await.unwrap();
    let mut second = handle.subscribe(CancellationToken::new()).await.unwrap();

    let published = publisher.publish(7, 2).await.unwrap();
    assert_eq!(published, StatusEvent::new(7, 2));

    assert_eq!(next_event(&mut first).await, Some(StatusEvent::new(7, 2)));
    assert_eq!(next_event(&mut second).await, Some(StatusEvent::new(7, 2)));
}

#[tokio::test]
async fn test_mixed_payload_versions_decode() {
    let broker = MemoryBroker::default();
    let (handle, _task) = start_coordinator(&broker, CoordinatorConfig::default());
    let text = StatusPublisher::new(Arc::new(broker.clone()), PayloadFormat::Text);
    let json = StatusPublisher::new(Arc::new(broker.clone()), PayloadFormat::Json);

    let mut stream = handle.subscribe(CancellationToken::new()).await.unwrap();

    text.publish(1, 10).await.unwrap();
    assert_eq!(next_event(&mut stream).await, Some(StatusEvent::new(1, 10)));

    json.publish(2, 20).await.unwrap();
    assert_eq!(next_event(&mut stream).await, Some(StatusEvent::new(2, 20)));
}

#[tokio::test]
async fn test_subscriber_only_sees_updates_after_subscribing() {
    let broker = MemoryBroker::default();
    let (handle, _task) = start_coordinator(&broker, CoordinatorConfig::default());
    let publisher = StatusPublisher::new(Arc::new(broker.clone()), PayloadFormat::Text);

    let mut early = handle.subscribe(CancellationToken::new()).await.unwrap();
    publisher.publish(1, 1).await.unwrap();
    assert_eq!(next_event(&mut early).await, Some(StatusEvent::new(1, 1)));

    let mut late = handle.subscribe(CancellationToken::new()).await.unwrap();
    publisher.publish(1, 2).await.unwrap();

    assert_eq!(next_event(&mut late).await, Some(StatusEvent::new(1, 2)));
    assert_eq!(next_event(&mut early).await, Some(StatusEvent::new(1, 2)));
}

// =============================================================================
// Cancellation
// =============================================================================

#[tokio::test]
async fn test_cancel_before_delivery_receives_nothing() {
    let broker = MemoryBroker::default();
    let (handle, _task) = start_coordinator(&broker, CoordinatorConfig::default());
    let publisher = StatusPublisher::new(Arc::new(broker.clone()), PayloadFormat::Text);

    let cancel = CancellationToken::new();
    let mut stream = handle.subscribe(cancel.clone()).await.unwrap();

    cancel.cancel();
    publisher.publish(3, 3).await.unwrap();

    assert_eq!(next_event(&mut stream).await, None);
}

#[tokio::test]
async fn test_cancelling_one_subscriber_leaves_others() {
    let broker = MemoryBroker::default();
    let (handle, _task) = start_coordinator(&broker, CoordinatorConfig::default());
    let publisher = StatusPublisher::new(Arc::new(broker.clone()), PayloadFormat::Text);

    let cancel = CancellationToken::new();
    let _leaving = handle.subscribe(cancel.clone()).await.unwrap();
    let mut staying = handle.subscribe(CancellationToken::new()).await.unwrap();

    cancel.cancel();
    for code in 0..3 {
        publisher.publish(5, code).await.unwrap();
    }

    let mut codes = Vec::new();
    for _ in 0..3 {
        codes.push(next_event(&mut staying).await.unwrap().code);
    }
    codes.sort();
    assert_eq!(codes, vec![0, 1, 2]);

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while handle.metrics().await.unwrap().active_subscriptions != 1 {
        assert!(tokio::time::Instant::now() < deadline, "cancelled subscriber never removed");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

// =============================================================================
// Delivery policy
// =============================================================================

#[tokio::test]
async fn test_delivery_deadline_releases_stalled_subscriber_tasks() {
    let broker = MemoryBroker::default();
    let config = CoordinatorConfig {
        delivery_timeout_ms: Some(20),
        ..Default::default()
    };
    let (handle, _task) = start_coordinator(&broker, config);
    let publisher = StatusPublisher::new(Arc::new(broker.clone()), PayloadFormat::Text);

    let mut stalled = handle.subscribe(CancellationToken::new()).await.unwrap();

    // First fills the sink, the rest expire
    for code in 0..3 {
        publisher.publish(8, code).await.unwrap();
    }
    tokio::time::sleep(Duration::from_millis(200)).await;

    let first = next_event(&mut stalled).await.unwrap();
    assert_eq!(first.id, 8);
    assert!(tokio::time::timeout(Duration::from_millis(100), stalled.next()).await.is_err());

    // Still subscribed after timeouts
    assert_eq!(handle.metrics().await.unwrap().active_subscriptions, 1);
}

// =============================================================================
// Coordinator lifecycle
// =============================================================================

#[tokio::test]
async fn test_coordinator_ends_when_feed_closes() {
    let broker = MemoryBroker::default();
    let (handle, task) = start_coordinator(&broker, CoordinatorConfig::default());

    handle.metrics().await.unwrap();
    drop(broker);

    let result = tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("Coordinator should stop")
        .unwrap();
    assert!(matches!(result, Err(CoordinatorError::FeedClosed)));

    // Handles report the closed channel instead of hanging
    assert!(handle.subscribe(CancellationToken::new()).await.is_err());
}

#[tokio::test]
async fn test_raw_garbage_never_produces_events() {
    let broker = MemoryBroker::default();
    let (handle, task) = start_coordinator(&broker, CoordinatorConfig::default());
    let mut stream = handle.subscribe(CancellationToken::new()).await.unwrap();

    broker.publish("status:abc", "1").await.unwrap();
    broker.publish("status:1", "x").await.unwrap();
    broker.publish("status:1", r#"{"v":9,"code":1}"#).await.unwrap();
    broker.publish("status:99999999999", "1").await.unwrap();

    assert!(tokio::time::timeout(Duration::from_millis(100), stream.next()).await.is_err());
    assert!(!task.is_finished());

    let metrics = handle.metrics().await.unwrap();
    assert_eq!(metrics.malformed_messages, 4);
    assert_eq!(metrics.events_dispatched, 0);
}
