//! Visited-set for graph traversals over a model's properties.
//!
//! Property handles are dense arena indices, so membership is a bitset sized
//! to the model's property count rather than a hash set.

use crate::model::PropertyId;

/// A compact bitset of property handles `0..len`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertySet {
    len: usize,
    bits: Box<[u64]>,
}

impl PropertySet {
    /// Create an empty set able to hold `len` properties.
    #[must_use]
    pub fn with_capacity(len: usize) -> Self {
        let words = len.div_ceil(64);
        Self {
            len,
            bits: vec![0u64; words].into_boxed_slice(),
        }
    }

    /// Number of property slots represented by this set.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.len
    }

    /// Add a property. Returns `false` if it was already present.
    ///
    /// Handles outside `0..len` are never stored and report `false`.
    pub fn insert(&mut self, property: PropertyId) -> bool {
        let idx = property.index();
        if idx >= self.len {
            return false;
        }
        let mask = 1u64 << (idx % 64);
        match self.bits.get_mut(idx / 64) {
            Some(w) if *w & mask == 0 => {
                *w |= mask;
                true
            }
            _ => false,
        }
    }

    /// Check whether a property is in the set.
    #[must_use]
    pub fn contains(&self, property: PropertyId) -> bool {
        let idx = property.index();
        if idx >= self.len {
            return false;
        }
        self.bits
            .get(idx / 64)
            .is_some_and(|w| (w & (1u64 << (idx % 64))) != 0)
    }

    /// Number of properties in the set.
    #[must_use]
    pub fn count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }
}
