//! Broadcast Coordinator for status updates
//!
//! The Coordinator is the single owner of the subscription registry. Three
//! inputs funnel into its control loop:
//! - **Requests:** subscribe registrations and metrics reads from handles
//! - **Unsubscribes:** ids reported by delivery tasks that saw cancellation
//! - **Broker feed:** raw messages decoded into StatusEvents and fanned out

mod config;
mod core;
mod delivery;
mod error;
mod handle;
mod messages;
mod registry;

pub use config::CoordinatorConfig;
pub use core::Coordinator;
pub use delivery::{DeliveryOutcome, deliver};
pub use error::CoordinatorError;
pub use handle::{CoordinatorHandle, StatusStream};
pub use messages::{CoordRequest, CoordinatorMetrics};
pub use registry::{Registry, Subscription};
