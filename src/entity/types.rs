//! Value types for queued entities.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordering key of a waiting record: `(priority class, sequence number)`.
///
/// Compared lexicographically, so the lower class wins and the earlier
/// sequence number wins within a class. Sequence numbers are unique per
/// queue, which makes this a strict total order over waiting records.
pub type OrderKey = (u8, u64);

/// System-assigned identity of an entity.
///
/// Allocated by the queue from a monotonically increasing counter and never
/// reused within one queue instance.
///
/// # Examples
///
/// ```
/// use u_triage::{Attributes, TriageQueue};
///
/// let mut queue = TriageQueue::new();
/// let id = queue.insert(Attributes::new("Alice", 30, "Fever"), 2).unwrap();
/// assert_eq!(id.as_str(), "P001");
/// assert!(queue.get("P001").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityId(String);

impl EntityId {
    pub(crate) fn format(prefix: &str, counter: u64, width: usize) -> Self {
        Self(format!("{prefix}{counter:0width$}"))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Descriptive fields of an entity. None of them affect ordering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attributes {
    /// Display name; the target of substring search.
    pub name: String,
    /// Numeric attribute (age in the clinic setting).
    pub age: u32,
    /// Free-text category (presenting condition in the clinic setting).
    pub condition: String,
}

impl Attributes {
    /// Creates a new attribute set.
    pub fn new(name: impl Into<String>, age: u32, condition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age,
            condition: condition.into(),
        }
    }
}

/// Lifecycle state of an entity.
///
/// Informational only: waiting records are exactly the ones held by the
/// queue, regardless of what this field says elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntityState {
    /// Held by the queue and eligible to be served.
    #[default]
    Waiting,
    /// Taken from the head of the queue.
    InService,
    /// Removed by id (or by clearing the queue) without being served.
    Removed,
}

impl fmt::Display for EntityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityState::Waiting => "Waiting",
            EntityState::InService => "In Service",
            EntityState::Removed => "Removed",
        };
        f.write_str(label)
    }
}

/// A queued item.
///
/// Equality and hashing use the id only: two snapshots of the same record
/// taken before and after an update compare equal.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entity {
    pub(crate) id: EntityId,
    pub(crate) attributes: Attributes,
    pub(crate) priority: u8,
    pub(crate) sequence: u64,
    pub(crate) state: EntityState,
}

impl Entity {
    pub(crate) fn new(id: EntityId, attributes: Attributes, priority: u8, sequence: u64) -> Self {
        Self {
            id,
            attributes,
            priority,
            sequence,
            state: EntityState::Waiting,
        }
    }

    /// Returns the entity's id.
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Returns the descriptive attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Shorthand for `attributes().name`.
    pub fn name(&self) -> &str {
        &self.attributes.name
    }

    /// Returns the priority class (lower is served sooner).
    pub fn priority(&self) -> u8 {
        self.priority
    }

    /// Returns the FIFO tie-break sequence number.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the lifecycle state.
    pub fn state(&self) -> EntityState {
        self.state
    }

    /// Returns the ordering key `(priority, sequence)`.
    #[inline]
    pub fn order_key(&self) -> OrderKey {
        (self.priority, self.sequence)
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Entity {}

impl Hash for Entity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<10} | {:<20} | Age: {:<3} | {:<25} | Priority: {:<3} | Status: {}",
            self.id,
            self.attributes.name,
            self.attributes.age,
            self.attributes.condition,
            self.priority,
            self.state
        )
    }
}
