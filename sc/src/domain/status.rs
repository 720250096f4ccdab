//! StatusEvent - a single (entity, status) update

use std::fmt;

use serde::{Deserialize, Serialize};

/// An entity's new status code, as decoded from the broker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusEvent {
    /// Entity identifier
    pub id: i32,

    /// New status code for the entity
    pub code: i32,
}

impl StatusEvent {
    pub fn new(id: i32, code: i32) -> Self {
        Self { id, code }
    }
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status {} -> {}", self.id, self.code)
    }
}
