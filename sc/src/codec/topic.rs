//! Topic naming: `status:<id>`

use super::error::DecodeError;

/// Prefix shared by every status topic
pub const TOPIC_PREFIX: &str = "status:";

/// Broker pattern matching every status topic
pub const TOPIC_PATTERN: &str = "status:*";

/// Topic a status update for `id` is published on
pub fn topic_for(id: i32) -> String {
    format!("{TOPIC_PREFIX}{id}")
}

/// Extract the entity id from a status topic
pub fn parse_topic(topic: &str) -> Result<i32, DecodeError> {
    let raw = topic.strip_prefix(TOPIC_PREFIX).ok_or_else(|| DecodeError::MissingPrefix {
        topic: topic.to_string(),
        prefix: TOPIC_PREFIX,
    })?;

    raw.parse::<i32>().map_err(|source| DecodeError::InvalidId {
        raw: raw.to_string(),
        source,
    })
}
