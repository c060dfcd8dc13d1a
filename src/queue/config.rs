//! Queue configuration.
//!
//! [`QueueConfig`] decides which priority classes are recognized, how ids are
//! rendered, and how updates treat a record's FIFO standing.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{QueueError, Result};

/// How [`TriageQueue::update`](super::TriageQueue::update) assigns sequence
/// numbers.
///
/// The sequence number is the FIFO tie-break within a priority class, so a
/// fresh one sends the record to the back of its class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SequencePolicy {
    /// Every update allocates a new sequence number, even when the priority
    /// class is unchanged.
    #[default]
    AlwaysRenew,

    /// Only updates that change the priority class allocate a new sequence
    /// number. Attribute-only edits keep the record's place in line.
    RenewOnPriorityChange,

    /// Updates never touch the sequence number. A record moved to another
    /// class keeps its original arrival order relative to that class.
    Preserve,
}

/// Configuration for a [`TriageQueue`](super::TriageQueue).
///
/// # Defaults
///
/// ```
/// use u_triage::{QueueConfig, SequencePolicy};
///
/// let config = QueueConfig::default();
/// assert_eq!(config.min_priority, 1);
/// assert_eq!(config.max_priority, 3);
/// assert_eq!(config.sequence_policy, SequencePolicy::AlwaysRenew);
/// assert_eq!(config.id_prefix, "P");
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_triage::{QueueConfig, SequencePolicy};
///
/// let config = QueueConfig::default()
///     .with_priority_range(0, 4)
///     .with_priority_labels(["IMMEDIATE", "EMERGENT", "URGENT", "LESS URGENT", "NON-URGENT"])
///     .with_sequence_policy(SequencePolicy::RenewOnPriorityChange)
///     .with_id_format("T", 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QueueConfig {
    /// Lowest recognized priority class (served first).
    pub min_priority: u8,

    /// Highest recognized priority class (served last).
    pub max_priority: u8,

    /// Human-readable label per class, indexed from `min_priority`.
    ///
    /// Either empty or exactly one label per recognized class.
    pub priority_labels: Vec<String>,

    /// Sequence number policy applied by updates.
    pub sequence_policy: SequencePolicy,

    /// Prefix prepended to every allocated id.
    pub id_prefix: String,

    /// Minimum number of digits in an id; shorter counters are zero-padded.
    pub id_width: usize,

    /// Number of records to pre-allocate room for.
    pub initial_capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            min_priority: 1,
            max_priority: 3,
            priority_labels: vec![
                "CRITICAL/EMERGENCY".to_string(),
                "URGENT".to_string(),
                "REGULAR".to_string(),
            ],
            sequence_policy: SequencePolicy::AlwaysRenew,
            id_prefix: "P".to_string(),
            id_width: 3,
            initial_capacity: 0,
        }
    }
}

impl QueueConfig {
    /// Sets the recognized priority range (inclusive on both ends).
    ///
    /// Labels are cleared, since they are tied to the previous range.
    pub fn with_priority_range(mut self, min: u8, max: u8) -> Self {
        self.min_priority = min;
        self.max_priority = max;
        self.priority_labels.clear();
        self
    }

    /// Sets the per-class labels, starting at `min_priority`.
    pub fn with_priority_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.priority_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the sequence number policy for updates.
    pub fn with_sequence_policy(mut self, policy: SequencePolicy) -> Self {
        self.sequence_policy = policy;
        self
    }

    /// Sets the id prefix and zero-padding width.
    pub fn with_id_format(mut self, prefix: impl Into<String>, width: usize) -> Self {
        self.id_prefix = prefix.into();
        self.id_width = width;
        self
    }

    /// Sets the number of records to pre-allocate room for.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Number of recognized priority classes.
    pub fn class_count(&self) -> usize {
        if self.min_priority > self.max_priority {
            0
        } else {
            usize::from(self.max_priority - self.min_priority) + 1
        }
    }

    /// Returns `true` if `priority` is a recognized class.
    #[inline]
    pub fn is_valid_priority(&self, priority: u8) -> bool {
        (self.min_priority..=self.max_priority).contains(&priority)
    }

    /// Validates `priority`, reporting the recognized range on failure.
    pub fn check_priority(&self, priority: u8) -> Result<()> {
        if self.is_valid_priority(priority) {
            Ok(())
        } else {
            Err(QueueError::InvalidPriority {
                priority,
                min: self.min_priority,
                max: self.max_priority,
            })
        }
    }

    /// Returns the label of `priority`, or `"UNKNOWN"` when the class is not
    /// recognized or no labels are configured.
    pub fn priority_label(&self, priority: u8) -> &str {
        if !self.is_valid_priority(priority) {
            return "UNKNOWN";
        }
        self.priority_labels
            .get(usize::from(priority - self.min_priority))
            .map(String::as_str)
            .unwrap_or("UNKNOWN")
    }

    /// Checks that the configuration describes a usable queue.
    pub fn validate(&self) -> Result<()> {
        if self.min_priority > self.max_priority {
            return Err(QueueError::InvalidConfig(format!(
                "min_priority {} exceeds max_priority {}",
                self.min_priority, self.max_priority
            )));
        }
        if !self.priority_labels.is_empty() && self.priority_labels.len() != self.class_count() {
            return Err(QueueError::InvalidConfig(format!(
                "expected {} priority labels, got {}",
                self.class_count(),
                self.priority_labels.len()
            )));
        }
        Ok(())
    }
}
