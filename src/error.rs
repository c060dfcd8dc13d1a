//! Error type shared by every queue operation.

use thiserror::Error;

/// Recoverable outcomes reported by [`TriageQueue`](crate::queue::TriageQueue).
///
/// None of these leave the queue partially mutated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    #[error("Priority class {priority} is outside the recognized range {min}..={max}")]
    InvalidPriority { priority: u8, min: u8, max: u8 },

    #[error("Entity '{0}' not found")]
    NotFound(String),

    #[error("Queue is empty")]
    EmptyQueue,

    #[error("Search query must not be empty")]
    InvalidSearchQuery,

    #[error("Invalid queue configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, QueueError>;
