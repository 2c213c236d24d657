//! Indexed binary max-heap with in-place key increase.
//!
//! Entries are dense slot numbers (graph node indices). A position table maps
//! each slot to its place in the heap, so [`IndexedMaxHeap::increase_key`]
//! can find and sift an entry in O(log n) instead of scanning the heap.
//!
//! Equal priorities pop in ascending slot order, which makes pop order a
//! pure function of the inputs.

use std::cmp::{Ordering, Reverse};

#[derive(Debug, Clone)]
pub struct IndexedMaxHeap<P> {
    /// Heap-ordered slots.
    heap: Vec<usize>,
    /// `position[slot]` is the slot's index in `heap` while it is queued.
    position: Vec<Option<usize>>,
    /// Current priority per slot; meaningful while the slot is queued.
    priority: Vec<Option<P>>,
}

impl<P: Ord + Copy> Default for IndexedMaxHeap<P> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<P: Ord + Copy> IndexedMaxHeap<P> {
    #[must_use]
    pub fn with_capacity(slots: usize) -> Self {
        Self {
            heap: Vec::with_capacity(slots),
            position: vec![None; slots],
            priority: vec![None; slots],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[must_use]
    pub fn contains(&self, slot: usize) -> bool {
        self.position.get(slot).is_some_and(Option::is_some)
    }

    /// Priority of a queued slot.
    #[must_use]
    pub fn priority(&self, slot: usize) -> Option<P> {
        if self.contains(slot) {
            self.priority[slot]
        } else {
            None
        }
    }

    /// Queue `slot` with `priority`. Returns `false` if it is already queued,
    /// leaving the existing entry untouched.
    pub fn push(&mut self, slot: usize, priority: P) -> bool {
        if slot >= self.position.len() {
            self.position.resize(slot + 1, None);
            self.priority.resize(slot + 1, None);
        }
        if self.position[slot].is_some() {
            return false;
        }

        let at = self.heap.len();
        self.heap.push(slot);
        self.position[slot] = Some(at);
        self.priority[slot] = Some(priority);
        self.sift_up(at);
        true
    }

    /// Remove and return the highest-priority slot.
    pub fn pop(&mut self) -> Option<(usize, P)> {
        let last = self.heap.len().checked_sub(1)?;
        self.swap(0, last);
        let slot = self.heap.pop()?;
        self.position[slot] = None;
        let priority = self.priority[slot].take()?;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some((slot, priority))
    }

    /// Raise a queued slot's priority. Returns `false` and changes nothing if
    /// the slot is not queued or `priority` is not strictly higher.
    pub fn increase_key(&mut self, slot: usize, priority: P) -> bool {
        let Some(at) = self.position.get(slot).copied().flatten() else {
            return false;
        };
        if self.priority[slot].is_some_and(|current| priority <= current) {
            return false;
        }
        self.priority[slot] = Some(priority);
        self.sift_up(at);
        true
    }

    /// `Greater` when the entry at heap index `a` should pop before `b`.
    fn order(&self, a: usize, b: usize) -> Ordering {
        let (sa, sb) = (self.heap[a], self.heap[b]);
        (self.priority[sa], Reverse(sa)).cmp(&(self.priority[sb], Reverse(sb)))
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.position[self.heap[a]] = Some(a);
        self.position[self.heap[b]] = Some(b);
    }

    fn sift_up(&mut self, mut at: usize) {
        while at > 0 {
            let parent = (at - 1) / 2;
            if self.order(at, parent) != Ordering::Greater {
                break;
            }
            self.swap(at, parent);
            at = parent;
        }
    }

    fn sift_down(&mut self, mut at: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * at + 1;
            let right = left + 1;
            let mut best = at;
            if left < len && self.order(left, best) == Ordering::Greater {
                best = left;
            }
            if right < len && self.order(right, best) == Ordering::Greater {
                best = right;
            }
            if best == at {
                break;
            }
            self.swap(at, best);
            at = best;
        }
    }
}
