//! statuscast - real-time status update fan-out
//!
//! Producers publish `(entity id, status code)` updates to a pub/sub broker.
//! A single Coordinator task consumes the broker's pattern subscription and
//! fans every decoded update out to all live subscribers, one short-lived
//! delivery task per subscriber and event, so a stalled or cancelled
//! subscriber never holds up the feed or anyone else.
//!
//! # Modules
//!
//! - [`coordinator`] - Registry owner, control loop and delivery tasks
//! - [`broker`] - Redis and in-memory broker adapters
//! - [`codec`] - Topic naming and versioned payload encoding
//! - [`publish`] - Publish pass-through
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod broker;
pub mod cli;
pub mod codec;
pub mod config;
pub mod coordinator;
pub mod domain;
pub mod publish;

// Re-export commonly used types
pub use broker::{BrokerError, EventSource, MemoryBroker, Publisher, RawMessage, RedisBroker};
pub use codec::{DecodeError, PayloadFormat};
pub use config::Config;
pub use coordinator::{
    Coordinator, CoordinatorConfig, CoordinatorError, CoordinatorHandle, CoordinatorMetrics, StatusStream,
};
pub use domain::StatusEvent;
pub use publish::StatusPublisher;
