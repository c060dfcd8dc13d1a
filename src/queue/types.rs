//! Reporting types for the queue engine.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lifetime counters and current composition of a queue.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QueueStats {
    /// Records ever inserted.
    pub admitted: u64,
    /// Records taken from the head.
    pub served: u64,
    /// Records removed by id or by clearing the queue.
    pub removed: u64,
    /// Successful updates.
    pub updated: u64,
    /// Records currently waiting.
    pub waiting: usize,
    /// Waiting records per recognized priority class, zero entries included.
    pub by_priority: BTreeMap<u8, usize>,
}

impl QueueStats {
    /// Number of waiting records in `priority`.
    pub fn waiting_in(&self, priority: u8) -> usize {
        self.by_priority.get(&priority).copied().unwrap_or(0)
    }
}
