//! Fixed-capacity ring of recently collided entity ids
//!
//! Replaces an ever-growing "already collided" set. Once full, inserting
//! overwrites the oldest id.

use crate::consts::COLLIDED_RING_CAPACITY;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecentRing<const N: usize = COLLIDED_RING_CAPACITY> {
    ids: [u32; N],
    len: usize,
    /// Next slot to write
    head: usize,
}

impl<const N: usize> Default for RecentRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RecentRing<N> {
    pub const fn new() -> Self {
        Self {
            ids: [0; N],
            len: 0,
            head: 0,
        }
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids[..self.len].contains(&id)
    }

    /// Record an id. Returns false if it was already present.
    pub fn insert(&mut self, id: u32) -> bool {
        if N == 0 || self.contains(id) {
            return false;
        }
        self.ids[self.head] = id;
        self.head = (self.head + 1) % N;
        self.len = (self.len + 1).min(N);
        true
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.len = 0;
        self.head = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.ids[..self.len].iter().copied()
    }
}
