//! Priority-class waiting queue with FIFO tie-break.
//!
//! Entities wait in a [`TriageQueue`] and are served in order of their
//! priority class (lower first) and, within a class, their arrival. Any
//! waiting entity can also be looked up, updated, or removed by id.
//!
//! - **[`entity`]**: the queued record, its id, attributes, and lifecycle state.
//! - **[`queue`]**: the engine, its configuration, and statistics.
//! - **[`error`]**: the recoverable outcomes every operation may report.
//!
//! # Architecture
//!
//! The engine owns all records. Ordering is an indexed binary min-heap over
//! slab storage keyed by `(priority, sequence)`; a hash index maps ids to
//! slab keys. Both are updated together on every mutation, so the set of
//! indexed ids and the set of heap members are always the same.
//!
//! Presentation (menus, input parsing, table rendering) is left to callers.

pub mod entity;
pub mod error;
pub mod queue;

pub use entity::{Attributes, Entity, EntityId, EntityState, OrderKey};
pub use error::{QueueError, Result};
pub use queue::{QueueConfig, QueueStats, SequencePolicy, TriageQueue};
