//! Wire codec for status updates
//!
//! Topics are `status:<id>` with the id in decimal. Payloads are versioned:
//! - **v0 (text):** the status code as signed decimal text, e.g. `"2"`
//! - **v1 (json):** an envelope `{"v":1,"code":2}`
//!
//! Decoding detects the version from the payload itself, so producers can
//! migrate one at a time.

mod error;
mod payload;
mod topic;

pub use error::DecodeError;
pub use payload::{PAYLOAD_VERSION, PayloadFormat, decode_payload, encode_payload};
pub use topic::{TOPIC_PATTERN, TOPIC_PREFIX, parse_topic, topic_for};

use crate::domain::StatusEvent;

/// Decode a raw broker message into a StatusEvent
pub fn decode(topic: &str, payload: &str) -> Result<StatusEvent, DecodeError> {
    let id = parse_topic(topic)?;
    let code = decode_payload(payload)?;
    Ok(StatusEvent { id, code })
}
