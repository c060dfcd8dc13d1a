//! Priority queue engine.
//!
//! # Structure
//!
//! Records live in a slab. A binary min-heap orders slab keys by
//! `(priority, sequence)`, and each slot remembers its heap position. The
//! identity index maps ids to slab keys. Together these give:
//!
//! | Operation                      | Cost       |
//! |--------------------------------|------------|
//! | insert / remove_head           | O(log n)   |
//! | remove_by_id / update          | O(log n)   |
//! | peek_head / get / len          | O(1)       |
//! | search_* / snapshot_ordered    | O(n log n) |
//!
//! Every mutating operation validates its inputs before touching any
//! structure, so a failed call leaves the queue exactly as it was.

use std::collections::{BTreeMap, HashMap};

use slab::Slab;
use tracing::{debug, trace};

use super::config::{QueueConfig, SequencePolicy};
use super::heap::{Heap, HeapEntry};
use super::types::QueueStats;
use crate::entity::{Attributes, Entity, EntityId, EntityState, OrderKey};
use crate::error::{QueueError, Result};

/// Queue size above which searches fan out over rayon.
#[cfg(feature = "parallel")]
const PARALLEL_SEARCH_THRESHOLD: usize = 4096;

#[derive(Debug, Clone)]
struct Slot {
    entity: Entity,
    heap_pos: Option<usize>,
}

impl HeapEntry for Slot {
    type Key = OrderKey;

    #[inline]
    fn key(&self) -> OrderKey {
        self.entity.order_key()
    }

    #[inline]
    fn heap_pos(&self) -> Option<usize> {
        self.heap_pos
    }

    #[inline]
    fn set_heap_pos(&mut self, pos: Option<usize>) {
        self.heap_pos = pos;
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Counters {
    admitted: u64,
    served: u64,
    removed: u64,
    updated: u64,
}

/// A waiting list served by priority class, then by arrival order.
///
/// # Examples
///
/// ```
/// use u_triage::{Attributes, QueueError, TriageQueue};
///
/// let mut queue = TriageQueue::new();
/// queue.insert(Attributes::new("Alice", 34, "Chest pain"), 1).unwrap();
/// queue.insert(Attributes::new("Bob", 52, "Checkup"), 3).unwrap();
/// queue.insert(Attributes::new("Carl", 8, "Sprained ankle"), 2).unwrap();
///
/// assert_eq!(queue.remove_head().unwrap().name(), "Alice");
/// assert_eq!(queue.remove_head().unwrap().name(), "Carl");
/// assert_eq!(queue.remove_head().unwrap().name(), "Bob");
/// assert_eq!(queue.remove_head(), Err(QueueError::EmptyQueue));
/// ```
///
/// # Concurrency
///
/// The engine is a plain single-owner value. To share it across threads,
/// wrap the whole queue in one lock (`Mutex<TriageQueue>` or
/// `RwLock<TriageQueue>` for read-mostly use) so each call stays atomic over
/// both the ordering and the identity index.
#[derive(Debug, Clone)]
pub struct TriageQueue {
    config: QueueConfig,
    slab: Slab<Slot>,
    heap: Heap,
    index: HashMap<EntityId, usize>,
    next_id: u64,
    next_sequence: u64,
    counters: Counters,
}

impl TriageQueue {
    /// Creates an empty queue with the default configuration
    /// (priority classes 1..=3, ids `P001`, `P002`, ...).
    pub fn new() -> Self {
        Self::build(QueueConfig::default())
    }

    /// Creates an empty queue after validating `config`.
    pub fn with_config(config: QueueConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: QueueConfig) -> Self {
        let capacity = config.initial_capacity;
        Self {
            config,
            slab: Slab::with_capacity(capacity),
            heap: Heap::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            next_id: 1,
            next_sequence: 0,
            counters: Counters::default(),
        }
    }

    /// Returns the configuration this queue was built with.
    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Admits a new record and returns its freshly allocated id.
    ///
    /// # Errors
    ///
    /// [`QueueError::InvalidPriority`] if `priority` is not a recognized class.
    pub fn insert(&mut self, attributes: Attributes, priority: u8) -> Result<EntityId> {
        self.config.check_priority(priority)?;

        let id = self.allocate_id();
        let sequence = self.allocate_sequence();
        let key = self.slab.insert(Slot {
            entity: Entity::new(id.clone(), attributes, priority, sequence),
            heap_pos: None,
        });
        self.heap.push(&mut self.slab, key);
        self.index.insert(id.clone(), key);
        self.counters.admitted += 1;
        debug_assert_eq!(self.slab.len(), self.index.len(), "slab/index size mismatch");

        debug!(id = %id, priority, sequence, waiting = self.len(), "entity admitted");
        Ok(id)
    }

    /// Serves the head: removes the record with the smallest
    /// `(priority, sequence)` and returns it in state
    /// [`EntityState::InService`].
    ///
    /// # Errors
    ///
    /// [`QueueError::EmptyQueue`] if nothing is waiting.
    pub fn remove_head(&mut self) -> Result<Entity> {
        let key = self
            .heap
            .pop(&mut self.slab)
            .ok_or(QueueError::EmptyQueue)?;
        let mut entity = self.detach(key);
        entity.state = EntityState::InService;
        self.counters.served += 1;

        debug!(id = %entity.id, priority = entity.priority, waiting = self.len(), "entity served");
        Ok(entity)
    }

    /// Removes the record `id` wherever it sits in the order and returns it
    /// in state [`EntityState::Removed`].
    ///
    /// # Errors
    ///
    /// [`QueueError::NotFound`] if no waiting record has this id.
    pub fn remove_by_id(&mut self, id: &str) -> Result<Entity> {
        let key = self.key_of(id)?;
        let removed = self.heap.remove(&mut self.slab, key);
        debug_assert!(removed, "indexed entity {id} missing from heap");
        let mut entity = self.detach(key);
        entity.state = EntityState::Removed;
        self.counters.removed += 1;

        debug!(id = %entity.id, priority = entity.priority, waiting = self.len(), "entity removed");
        Ok(entity)
    }

    /// Replaces the attributes and priority class of `id`.
    ///
    /// The record leaves the ordering, is modified, and re-enters it. Whether
    /// it also gets a fresh sequence number (and so goes to the back of its
    /// class) is decided by [`QueueConfig::sequence_policy`].
    ///
    /// # Errors
    ///
    /// [`QueueError::NotFound`] if `id` is not waiting, otherwise
    /// [`QueueError::InvalidPriority`] if `priority` is not recognized. The
    /// queue is untouched on error.
    pub fn update(&mut self, id: &str, attributes: Attributes, priority: u8) -> Result<&Entity> {
        let key = self.key_of(id)?;
        self.config.check_priority(priority)?;

        let old_priority = self.slot(key).entity.priority;
        let renew = match self.config.sequence_policy {
            SequencePolicy::AlwaysRenew => true,
            SequencePolicy::RenewOnPriorityChange => old_priority != priority,
            SequencePolicy::Preserve => false,
        };

        let removed = self.heap.remove(&mut self.slab, key);
        debug_assert!(removed, "indexed entity {id} missing from heap");

        let sequence = renew.then(|| self.allocate_sequence());
        let entity = &mut self.slot_mut(key).entity;
        entity.attributes = attributes;
        entity.priority = priority;
        if let Some(sequence) = sequence {
            entity.sequence = sequence;
        }

        self.heap.push(&mut self.slab, key);
        self.counters.updated += 1;

        let entity = &self.slot(key).entity;
        debug!(
            id = %entity.id,
            old_priority,
            priority,
            sequence = entity.sequence,
            renewed = renew,
            "entity updated"
        );
        Ok(entity)
    }

    /// Removes every waiting record and returns them in service order, each
    /// in state [`EntityState::Removed`].
    ///
    /// Id and sequence counters keep running; nothing is reused afterwards.
    pub fn clear(&mut self) -> Vec<Entity> {
        self.heap.clear(&mut self.slab);
        self.index.clear();
        let mut drained: Vec<Entity> = self
            .slab
            .drain()
            .map(|slot| {
                let mut entity = slot.entity;
                entity.state = EntityState::Removed;
                entity
            })
            .collect();
        drained.sort_unstable_by_key(Entity::order_key);
        self.counters.removed += drained.len() as u64;

        debug!(cleared = drained.len(), "queue cleared");
        drained
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Returns the record [`remove_head`](Self::remove_head) would serve,
    /// without removing it.
    ///
    /// # Errors
    ///
    /// [`QueueError::EmptyQueue`] if nothing is waiting.
    pub fn peek_head(&self) -> Result<&Entity> {
        let key = self.heap.peek().ok_or(QueueError::EmptyQueue)?;
        Ok(&self.slot(key).entity)
    }

    /// Looks up a waiting record by id.
    pub fn get(&self, id: &str) -> Option<&Entity> {
        let found = self.index.get(id).map(|&key| &self.slot(key).entity);
        trace!(id, found = found.is_some(), "lookup by id");
        found
    }

    /// Returns `true` if a record with this id is waiting.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Finds waiting records whose name contains `query`, ignoring case and
    /// surrounding whitespace.
    ///
    /// Results come back in service order.
    ///
    /// # Errors
    ///
    /// [`QueueError::InvalidSearchQuery`] if `query` is empty or blank.
    pub fn search_by_name(&self, query: &str) -> Result<Vec<&Entity>> {
        let needle = query.trim();
        if needle.is_empty() {
            return Err(QueueError::InvalidSearchQuery);
        }
        let needle = needle.to_lowercase();
        let found = self.filter_waiting(|entity| entity.name().to_lowercase().contains(&needle));

        trace!(query, matches = found.len(), "search by name");
        Ok(found)
    }

    /// Finds waiting records in exactly this priority class, in service order.
    ///
    /// An unrecognized class simply matches nothing.
    pub fn search_by_priority(&self, priority: u8) -> Vec<&Entity> {
        let found = self.filter_waiting(|entity| entity.priority == priority);
        trace!(priority, matches = found.len(), "search by priority");
        found
    }

    /// Returns every waiting record in service order without consuming any.
    pub fn snapshot_ordered(&self) -> Vec<&Entity> {
        let mut ordered: Vec<&Entity> = self
            .heap
            .keys()
            .iter()
            .map(|&key| &self.slot(key).entity)
            .collect();
        ordered.sort_unstable_by_key(|entity| entity.order_key());
        ordered
    }

    /// Iterates waiting records in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.slab.iter().map(|(_, slot)| &slot.entity)
    }

    /// Number of waiting records.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if nothing is waiting.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns the configured label of a priority class.
    pub fn priority_label(&self, priority: u8) -> &str {
        self.config.priority_label(priority)
    }

    /// Returns lifetime counters and the current per-class breakdown.
    pub fn stats(&self) -> QueueStats {
        let mut by_priority: BTreeMap<u8, usize> = (self.config.min_priority
            ..=self.config.max_priority)
            .map(|p| (p, 0))
            .collect();
        for entity in self.iter() {
            *by_priority.entry(entity.priority).or_insert(0) += 1;
        }

        QueueStats {
            admitted: self.counters.admitted,
            served: self.counters.served,
            removed: self.counters.removed,
            updated: self.counters.updated,
            waiting: self.len(),
            by_priority,
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId::format(&self.config.id_prefix, self.next_id, self.config.id_width);
        self.next_id += 1;
        id
    }

    fn allocate_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }

    fn key_of(&self, id: &str) -> Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| QueueError::NotFound(id.to_string()))
    }

    /// Takes a slot that has already left the heap out of the slab and the
    /// identity index.
    fn detach(&mut self, key: usize) -> Entity {
        let slot = match self.slab.try_remove(key) {
            Some(slot) => slot,
            None => panic!("heap yielded vacant slab key {key}"),
        };
        debug_assert!(slot.heap_pos.is_none(), "detached slot still in heap");
        let indexed = self.index.remove(slot.entity.id.as_str());
        debug_assert_eq!(indexed, Some(key), "identity index out of sync for {}", slot.entity.id);
        slot.entity
    }

    #[inline]
    fn slot(&self, key: usize) -> &Slot {
        match self.slab.get(key) {
            Some(slot) => slot,
            None => panic!("dangling slab key {key}"),
        }
    }

    #[inline]
    fn slot_mut(&mut self, key: usize) -> &mut Slot {
        match self.slab.get_mut(key) {
            Some(slot) => slot,
            None => panic!("dangling slab key {key}"),
        }
    }

    /// Waiting records matching `predicate`, in service order.
    fn filter_waiting<F>(&self, predicate: F) -> Vec<&Entity>
    where
        F: Fn(&Entity) -> bool + Sync,
    {
        #[cfg(feature = "parallel")]
        {
            if self.len() >= PARALLEL_SEARCH_THRESHOLD {
                use rayon::prelude::*;

                let mut found: Vec<&Entity> = self
                    .heap
                    .keys()
                    .par_iter()
                    .map(|&key| &self.slot(key).entity)
                    .filter(|&entity| predicate(entity))
                    .collect();
                found.sort_unstable_by_key(|entity| entity.order_key());
                return found;
            }
        }

        let mut found: Vec<&Entity> = self.iter().filter(|&entity| predicate(entity)).collect();
        found.sort_unstable_by_key(|entity| entity.order_key());
        found
    }

    /// Panics unless heap, slab, and identity index describe the same set
    /// of records with correct back-pointers and heap order.
    #[cfg(test)]
    fn assert_consistent(&self) {
        assert_eq!(self.heap.len(), self.index.len(), "heap/index size mismatch");
        assert_eq!(self.slab.len(), self.index.len(), "slab/index size mismatch");
        for (id, &key) in &self.index {
            let slot = self.slot(key);
            assert_eq!(&slot.entity.id, id);
            assert_eq!(slot.entity.state, EntityState::Waiting);
            let pos = slot.heap_pos.expect("indexed slot not in heap");
            assert_eq!(self.heap.keys()[pos], key);
        }
        let keys = self.heap.keys();
        for pos in 1..keys.len() {
            let parent = (pos - 1) / 2;
            assert!(self.slot(keys[parent]).key() < self.slot(keys[pos]).key());
        }
    }
}

impl Default for TriageQueue {
    fn default() -> Self {
        Self::new()
    }
}
