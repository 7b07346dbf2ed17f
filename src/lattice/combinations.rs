// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Lexicographic enumeration of k-subsets of `0..n`.
//!
//! # Examples
//!
//! ```
//! use nash_blowup::lattice::Combinations;
//!
//! let subsets: Vec<Vec<usize>> = Combinations::new(4, 2).collect();
//! assert_eq!(subsets.len(), 6);
//! assert_eq!(subsets[0], vec![0, 1]);
//! assert_eq!(subsets[5], vec![2, 3]);
//! ```

/// Iterator over the k-subsets of `0..n` in lexicographic order.
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    current: Option<Vec<usize>>,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        let current = if k <= n { Some((0..k).collect()) } else { None };
        Self { n, current }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.current.clone()?;
        let k = result.len();

        // Advance to the next subset: bump the rightmost index that still has room
        let mut next = result.clone();
        let mut i = k;
        loop {
            if i == 0 {
                self.current = None;
                break;
            }
            i -= 1;
            if next[i] < self.n - k + i {
                next[i] += 1;
                for j in (i + 1)..k {
                    next[j] = next[j - 1] + 1;
                }
                self.current = Some(next);
                break;
            }
        }
        Some(result)
    }
}

/// Binomial coefficient, saturating at `usize::MAX`.
pub fn choose(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: usize = 1;
    for i in 0..k {
        result = result.saturating_mul(n - i) / (i + 1);
    }
    result
}
