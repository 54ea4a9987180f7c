use bitvec::prelude::*;
use std::fmt;

/// Fixed-size bitset over dense indices
///
/// Backs both grid cell masks (index `row * cols + col`) and sets of
/// placement indices. Out-of-range indices are ignored on insert and
/// report absent on lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexBitset {
    bits: BitVec,
}

impl IndexBitset {
    /// Create a bitset with no indices present
    pub fn new(len: usize) -> Self {
        Self {
            bits: bitvec![0; len],
        }
    }

    /// Create a bitset containing every index below `len`
    pub fn all(len: usize) -> Self {
        Self {
            bits: bitvec![1; len],
        }
    }

    /// Number of addressable indices
    pub fn capacity(&self) -> usize {
        self.bits.len()
    }

    /// Insert an index
    pub fn insert(&mut self, index: usize) {
        if index < self.bits.len() {
            self.bits.set(index, true);
        }
    }

    /// Remove an index, returning whether it was present
    pub fn remove(&mut self, index: usize) -> bool {
        let present = self.contains(index);
        if present {
            self.bits.set(index, false);
        }
        present
    }

    /// Test index membership
    pub fn contains(&self, index: usize) -> bool {
        self.bits.get(index).as_deref() == Some(&true)
    }

    /// Test if no indices are present
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Count indices in the set
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Iterate present indices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Extract all indices as a vector
    pub fn to_vec(&self) -> Vec<usize> {
        self.bits.iter_ones().collect()
    }
}

impl fmt::Display for IndexBitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IndexBitset({} set: {:?})", self.count(), self.to_vec())
    }
}
