//! Binary min-heap over slab storage with removal by key.
//!
//! Every entry records its own position in the heap array, so an element
//! anywhere in the heap can be located in O(1) and removed in O(log n)
//! without scanning.

use slab::Slab;

/// A value that can sit in a [`Heap`].
pub(crate) trait HeapEntry {
    type Key: Ord + Copy;

    /// Ordering key; the smallest key is the heap root.
    fn key(&self) -> Self::Key;

    /// Current position in the heap array, or `None` if not in a heap.
    fn heap_pos(&self) -> Option<usize>;

    fn set_heap_pos(&mut self, pos: Option<usize>);
}

/// Heap-ordered array of slab keys.
#[derive(Debug, Clone, Default)]
pub(crate) struct Heap {
    heap: Vec<usize>,
}

impl Heap {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Slab key of the minimum entry.
    #[inline]
    pub(crate) fn peek(&self) -> Option<usize> {
        self.heap.first().copied()
    }

    /// Slab keys in heap-array order (not sorted).
    pub(crate) fn keys(&self) -> &[usize] {
        &self.heap
    }

    /// Adds the entry stored at `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` is vacant. Debug builds also panic if the entry is
    /// already in a heap.
    pub(crate) fn push<T: HeapEntry>(&mut self, slab: &mut Slab<T>, key: usize) {
        let pos = self.heap.len();
        let entry = entry_mut(slab, key);
        debug_assert!(entry.heap_pos().is_none(), "entry already in heap");
        entry.set_heap_pos(Some(pos));
        self.heap.push(key);
        self.sift_up(slab, pos);
    }

    /// Removes the minimum entry and returns its slab key.
    ///
    /// The entry stays in the slab; only its heap membership is cleared.
    pub(crate) fn pop<T: HeapEntry>(&mut self, slab: &mut Slab<T>) -> Option<usize> {
        let key = self.peek()?;
        self.remove(slab, key);
        Some(key)
    }

    /// Removes the entry at `key` from wherever it sits in the heap.
    ///
    /// Returns `false` if `key` is vacant or not in the heap.
    pub(crate) fn remove<T: HeapEntry>(&mut self, slab: &mut Slab<T>, key: usize) -> bool {
        let Some(pos) = slab.get(key).and_then(HeapEntry::heap_pos) else {
            return false;
        };
        debug_assert_eq!(self.heap.get(pos), Some(&key), "stale heap position");

        entry_mut(slab, key).set_heap_pos(None);

        let last = match self.heap.pop() {
            Some(last) => last,
            None => return false,
        };
        if pos < self.heap.len() {
            self.heap[pos] = last;
            entry_mut(slab, last).set_heap_pos(Some(pos));
            // The moved entry may belong above or below its new slot
            let pos = self.sift_up(slab, pos);
            self.sift_down(slab, pos);
        }

        true
    }

    /// Drops every heap membership, leaving the slab untouched.
    pub(crate) fn clear<T: HeapEntry>(&mut self, slab: &mut Slab<T>) {
        for &key in &self.heap {
            if let Some(entry) = slab.get_mut(key) {
                entry.set_heap_pos(None);
            }
        }
        self.heap.clear();
    }

    fn sift_up<T: HeapEntry>(&mut self, slab: &mut Slab<T>, mut pos: usize) -> usize {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if key_at(slab, self.heap[pos]) < key_at(slab, self.heap[parent]) {
                self.swap(slab, pos, parent);
                pos = parent;
            } else {
                break;
            }
        }
        pos
    }

    fn sift_down<T: HeapEntry>(&mut self, slab: &mut Slab<T>, mut pos: usize) -> usize {
        let len = self.heap.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let smaller = if right < len
                && key_at(slab, self.heap[right]) < key_at(slab, self.heap[left])
            {
                right
            } else {
                left
            };

            if key_at(slab, self.heap[smaller]) < key_at(slab, self.heap[pos]) {
                self.swap(slab, pos, smaller);
                pos = smaller;
            } else {
                break;
            }
        }
        pos
    }

    fn swap<T: HeapEntry>(&mut self, slab: &mut Slab<T>, a: usize, b: usize) {
        self.heap.swap(a, b);
        entry_mut(slab, self.heap[a]).set_heap_pos(Some(a));
        entry_mut(slab, self.heap[b]).set_heap_pos(Some(b));
    }
}

#[inline]
fn key_at<T: HeapEntry>(slab: &Slab<T>, key: usize) -> T::Key {
    match slab.get(key) {
        Some(entry) => entry.key(),
        None => panic!("heap references vacant slab key {key}"),
    }
}

#[inline]
fn entry_mut<T: HeapEntry>(slab: &mut Slab<T>, key: usize) -> &mut T {
    match slab.get_mut(key) {
        Some(entry) => entry,
        None => panic!("heap references vacant slab key {key}"),
    }
}
