// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Lexicographically minimal Hermite normal form over admissible column orders.
//!
//! For a fixed column order the row-style Hermite normal form `H = U·A`
//! (`U` unimodular) is unique. Column `j` of `H` only depends on the columns
//! placed before it, so the minimum over all orders can be found column by
//! column: every branch offers its candidates for the next position, the
//! smallest resulting column wins, and only the branches that produced it
//! survive. Branches that reach the same residual state are merged.

use crate::lattice::{narrow, vector_gcd, LatticeError};
use num_integer::Integer;
use std::collections::BTreeSet;
use tracing::trace;

/// Partial Hermite form: `pivots` rows are settled and the remaining columns,
/// tagged with their class, have been transformed accordingly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Branch {
    pivots: usize,
    remaining: Vec<(usize, Vec<i64>)>,
}

impl Branch {
    /// The class that must be placed next.
    fn next_class(&self) -> Option<usize> {
        self.remaining.first().map(|(class, _)| *class)
    }
}

/// Columns of the minimal Hermite normal form of `columns`.
///
/// Columns are placed in ascending `classes` order; within a class every order
/// is tried. `columns` must span `dim` dimensions for the form to be unique.
pub fn minimal_hermite_columns(
    columns: &[Vec<i64>],
    classes: &[usize],
    dim: usize,
) -> Result<Vec<Vec<i64>>, LatticeError> {
    let mut remaining: Vec<(usize, Vec<i64>)> =
        classes.iter().copied().zip(columns.iter().cloned()).collect();
    remaining.sort();

    let mut branches: BTreeSet<Branch> = BTreeSet::new();
    branches.insert(Branch {
        pivots: 0,
        remaining,
    });
    let mut result = Vec::with_capacity(columns.len());

    for position in 0..columns.len() {
        let mut best: Option<Vec<i64>> = None;
        let mut winners: Vec<(&Branch, usize)> = Vec::new();

        for branch in &branches {
            let Some(class) = branch.next_class() else {
                continue;
            };
            let mut offered: BTreeSet<&Vec<i64>> = BTreeSet::new();
            for (index, (c, w)) in branch.remaining.iter().enumerate() {
                if *c != class || !offered.insert(w) {
                    continue;
                }
                let candidate = hermite_column(w, branch.pivots);
                match best.as_ref().map(|b| candidate.cmp(b)) {
                    None | Some(std::cmp::Ordering::Less) => {
                        best = Some(candidate);
                        winners.clear();
                        winners.push((branch, index));
                    }
                    Some(std::cmp::Ordering::Equal) => winners.push((branch, index)),
                    Some(std::cmp::Ordering::Greater) => {}
                }
            }
        }

        let mut next = BTreeSet::new();
        for (branch, index) in winners {
            next.insert(advance(branch, index, dim)?);
        }
        trace!(position, branches = next.len(), "hermite search step");
        branches = next;
        if let Some(column) = best {
            result.push(column);
        }
    }
    Ok(result)
}

/// The column that `w` becomes when placed next in a form with `pivots` settled rows.
fn hermite_column(w: &[i64], pivots: usize) -> Vec<i64> {
    let g = vector_gcd(&w[pivots..]);
    if g == 0 {
        return w.to_vec();
    }
    let mut column = vec![0; w.len()];
    for i in 0..pivots {
        column[i] = w[i].rem_euclid(g);
    }
    column[pivots] = g;
    column
}

/// Place column `index` of `branch` next and apply the row operations that put it
/// in Hermite form to every remaining column.
fn advance(branch: &Branch, index: usize, dim: usize) -> Result<Branch, LatticeError> {
    let r = branch.pivots;
    let mut rest = branch.remaining.clone();
    let (_, mut w) = rest.remove(index);

    if w[r..].iter().all(|&x| x == 0) {
        rest.sort();
        return Ok(Branch {
            pivots: r,
            remaining: rest,
        });
    }

    // Clear rows below r with 2x2 unimodular operations on rows r and k
    for k in (r + 1)..dim {
        let a = w[r] as i128;
        let b = w[k] as i128;
        if b == 0 {
            continue;
        }
        let e = a.extended_gcd(&b);
        let (x, y, s, t) = (e.x, e.y, -b / e.gcd, a / e.gcd);
        let apply = |v: &mut Vec<i64>| -> Result<(), LatticeError> {
            let vr = v[r] as i128;
            let vk = v[k] as i128;
            v[r] = combine(x, vr, y, vk)?;
            v[k] = combine(s, vr, t, vk)?;
            Ok(())
        };
        apply(&mut w)?;
        for (_, v) in rest.iter_mut() {
            apply(v)?;
        }
    }

    if w[r] < 0 {
        w[r] = -w[r];
        for (_, v) in rest.iter_mut() {
            v[r] = v[r].checked_neg().ok_or(LatticeError::Overflow("hermite sign"))?;
        }
    }

    // Reduce the rows above the pivot
    let pivot = w[r] as i128;
    for i in 0..r {
        let q = (w[i] as i128).div_euclid(pivot);
        if q == 0 {
            continue;
        }
        w[i] = combine(1, w[i] as i128, -q, pivot)?;
        for (_, v) in rest.iter_mut() {
            v[i] = combine(1, v[i] as i128, -q, v[r] as i128)?;
        }
    }
    debug_assert_eq!(w, hermite_column(&w, r), "pivot column not in Hermite form");

    rest.sort();
    Ok(Branch {
        pivots: r + 1,
        remaining: rest,
    })
}

/// `x·a + y·b`, checked and narrowed.
fn combine(x: i128, a: i128, y: i128, b: i128) -> Result<i64, LatticeError> {
    x.checked_mul(a)
        .zip(y.checked_mul(b))
        .and_then(|(p, q)| p.checked_add(q))
        .ok_or(LatticeError::Overflow("hermite row operation"))
        .and_then(|v| narrow(v, "hermite row operation"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_fixed() {
        let id = vec![vec![1, 0, 0], vec![0, 1, 0], vec![0, 0, 1]];
        let h = minimal_hermite_columns(&id, &[0, 0, 0], 3).unwrap();
        assert_eq!(h, id);
    }

    #[test]
    fn test_a1_normal_form() {
        // cone((1,0),(1,2)) in any basis becomes (1,0),(1,2)
        let cols = vec![vec![1, 2], vec![1, 0]];
        let h = minimal_hermite_columns(&cols, &[0, 0], 2).unwrap();
        assert_eq!(h, vec![vec![1, 0], vec![1, 2]]);

        let moved = vec![vec![3, 2], vec![1, 0]]; // (x + y, y) applied
        let h2 = minimal_hermite_columns(&moved, &[0, 0], 2).unwrap();
        assert_eq!(h2, h);
    }

    #[test]
    fn test_classes_fix_order() {
        let cols = vec![vec![1, 0], vec![0, 1]];
        let h = minimal_hermite_columns(&cols, &[1, 0], 2).unwrap();
        assert_eq!(h, vec![vec![1, 0], vec![0, 1]]);
    }

    #[test]
    fn test_hermite_column_reduces_above_pivot() {
        assert_eq!(hermite_column(&[5, 4, -6], 1), vec![1, 2, 0]);
        assert_eq!(hermite_column(&[5, 0, 0], 1), vec![5, 0, 0]);
    }

    #[test]
    fn test_non_pivot_columns() {
        // Second column is a multiple of the first: no new pivot
        let cols = vec![vec![2, 0], vec![4, 0], vec![1, 3]];
        let h = minimal_hermite_columns(&cols, &[0, 1, 2], 2).unwrap();
        assert_eq!(h, vec![vec![2, 0], vec![4, 0], vec![1, 3]]);
    }
}
