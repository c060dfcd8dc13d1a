//! Entity records held by the queue.
//!
//! An [`Entity`] has an immutable identity ([`EntityId`]) and mutable
//! descriptive [`Attributes`]. Its position in the queue is decided only by
//! the ordering key `(priority, sequence)`, where a lower priority class is
//! served first and the sequence number breaks ties in arrival order.
//!
//! Records are created and mutated exclusively by
//! [`TriageQueue`](crate::queue::TriageQueue); callers only ever see them
//! through shared references or as owned values that have already left the
//! queue.

mod types;

pub use types::{Attributes, Entity, EntityId, EntityState, OrderKey};
