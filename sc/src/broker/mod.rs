//! Broker adapters
//!
//! The Coordinator consumes an [`EventSource`] and the publish path writes
//! through a [`Publisher`]. Two implementations are provided:
//! - [`RedisBroker`] for a real Redis server (PSUBSCRIBE / PUBLISH)
//! - [`MemoryBroker`] for in-process use and tests

mod error;
mod memory;
mod redis_broker;
mod traits;

pub use error::BrokerError;
pub use memory::MemoryBroker;
pub use redis_broker::RedisBroker;
pub use traits::{EventSource, MessageStream, Publisher, RawMessage};
