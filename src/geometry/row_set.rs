// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! RowSet type for representing sets of constraint rows as bitsets.
//!
//! The double description method tracks, for every candidate ray, the set of
//! constraints it satisfies with equality. Those zero sets are intersected and
//! compared for inclusion constantly, so they are stored as word bitsets.
//!
//! # Examples
//!
//! ```
//! use nash_blowup::geometry::RowSet;
//!
//! let mut a = RowSet::with_capacity(100);
//! a.insert(3);
//! a.insert(70);
//! let mut b = RowSet::with_capacity(100);
//! b.insert(70);
//!
//! assert!(b.is_subset(&a));
//! assert_eq!(a.intersection(&b).len(), 1);
//! ```

/// A set of row indices represented as a bitset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowSet(Vec<u64>);

impl RowSet {
    /// Create an empty set able to hold indices `0..capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self(vec![0; capacity.div_ceil(64)])
    }

    pub fn contains(&self, row: usize) -> bool {
        self.0
            .get(row / 64)
            .is_some_and(|word| (word >> (row % 64)) & 1 != 0)
    }

    /// Insert a row.
    ///
    /// # Panics
    ///
    /// Panics if `row` is beyond the capacity given at construction.
    pub fn insert(&mut self, row: usize) {
        self.0[row / 64] |= 1u64 << (row % 64);
    }

    /// Get the number of rows in the set (population count).
    pub fn len(&self) -> usize {
        self.0.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&w| w == 0)
    }

    pub fn intersection(&self, other: &Self) -> Self {
        Self(self.0.iter().zip(&other.0).map(|(a, b)| a & b).collect())
    }

    /// True if every row of `self` is also in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.0.iter().zip(&other.0).all(|(a, b)| a & !b == 0)
    }

    /// Iterate over the rows in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().enumerate().flat_map(|(w, &word)| {
            (0..64)
                .filter(move |bit| (word >> bit) & 1 != 0)
                .map(move |bit| w * 64 + bit)
        })
    }
}
