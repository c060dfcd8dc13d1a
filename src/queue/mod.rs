//! Priority queue engine.
//!
//! [`TriageQueue`] keeps waiting [`Entity`](crate::Entity) records ordered by
//! priority class and, within a class, by arrival. Unlike a plain binary
//! heap it can also find, update, and remove any waiting record by id in
//! O(log n), because the heap entries track their own positions and an
//! identity index maps ids to entries.
//!
//! # Update policy
//!
//! Changing a record goes through remove-then-reinsert. Whether the record
//! keeps its FIFO standing is an explicit [`SequencePolicy`] on
//! [`QueueConfig`]; the default renews the sequence number on every update.

mod config;
mod engine;
mod heap;
mod types;

pub use config::{QueueConfig, SequencePolicy};
pub use engine::TriageQueue;
pub use types::QueueStats;
