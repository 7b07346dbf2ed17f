// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Lattice invariants of the generators of a pointed cone.
//!
//! Under a unimodular change of basis `U`, generators move by `U` and facet
//! normals by `U^{-T}`, so the pairing matrix `P[f][v] = <u_f, v>` only changes
//! by permuting rows and columns. Any quantity computed from `P` that does not
//! depend on row or column positions is therefore invariant.

use crate::lattice;
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Sort key for a generator. Classes are listed in ascending key order.
///
/// Compared field by field:
/// 1. generators on more facets come first,
/// 2. the sorted multiset of pairings with all facets,
/// 3. the sorted multiset of (pairing, class of the facet it pairs with).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ColumnKey {
    incidence: Reverse<usize>,
    pairings: Vec<i128>,
    profile: Vec<(i128, usize)>,
}

/// Pairing matrix, indexed `[facet][generator]`.
pub fn pairing_matrix(facets: &[Vec<i64>], generators: &[Vec<i64>]) -> Vec<Vec<i128>> {
    facets
        .iter()
        .map(|u| generators.iter().map(|v| lattice::dot(u, v)).collect())
        .collect()
}

/// Key of every generator.
pub fn column_keys(pairing: &[Vec<i128>], columns: usize) -> Vec<ColumnKey> {
    // Facets are ranked by their sorted row; equal rows share a rank
    let profiles: Vec<Vec<i128>> = pairing
        .iter()
        .map(|row| {
            let mut sorted = row.clone();
            sorted.sort_unstable();
            sorted
        })
        .collect();
    let ranks: BTreeMap<&Vec<i128>, usize> = {
        let mut distinct: Vec<&Vec<i128>> = profiles.iter().collect();
        distinct.sort();
        distinct.dedup();
        distinct.into_iter().enumerate().map(|(i, p)| (p, i)).collect()
    };
    let facet_rank: Vec<usize> = profiles.iter().map(|p| ranks[p]).collect();

    (0..columns)
        .map(|v| {
            let mut pairings: Vec<i128> = pairing.iter().map(|row| row[v]).collect();
            let mut profile: Vec<(i128, usize)> = pairing
                .iter()
                .zip(&facet_rank)
                .map(|(row, &rank)| (row[v], rank))
                .collect();
            pairings.sort_unstable();
            profile.sort_unstable();
            ColumnKey {
                incidence: Reverse(pairings.iter().filter(|&&x| x == 0).count()),
                pairings,
                profile,
            }
        })
        .collect()
}

/// Dense class index of every generator: equal keys share a class, and class
/// indices increase with the key.
pub fn column_classes(facets: &[Vec<i64>], generators: &[Vec<i64>]) -> Vec<usize> {
    let pairing = pairing_matrix(facets, generators);
    let keys = column_keys(&pairing, generators.len());
    let mut distinct: Vec<&ColumnKey> = keys.iter().collect();
    distinct.sort();
    distinct.dedup();
    keys.iter()
        .map(|k| distinct.partition_point(|d| *d < k))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simplicial_cone_has_one_class() {
        let facets = vec![vec![0, 1], vec![1, 0]];
        let gens = vec![vec![1, 0], vec![0, 1]];
        assert_eq!(column_classes(&facets, &gens), vec![0, 0]);
    }

    #[test]
    fn test_interior_generator_sorts_last() {
        // A1 semigroup generators: two rays on a facet each, (1,1) on none
        let facets = vec![vec![0, 1], vec![2, -1]];
        let gens = vec![vec![1, 1], vec![1, 0], vec![1, 2]];
        let classes = column_classes(&facets, &gens);
        assert_eq!(classes[1], classes[2]);
        assert!(classes[0] > classes[1]);
    }

    #[test]
    fn test_pairings_separate_rays() {
        // The rays of cone((1,0),(1,3)) look alike on their own, but (1,1) is
        // closer to one facet than the other, which tells them apart
        let facets = vec![vec![0, 1], vec![3, -1]];
        let gens = vec![vec![1, 0], vec![1, 3], vec![1, 1]];
        let pairing = pairing_matrix(&facets, &gens);
        assert_eq!(pairing, vec![vec![0, 3, 1], vec![3, 0, 2]]);
        let classes = column_classes(&facets, &gens);
        assert_eq!(classes, vec![0, 1, 2]);
    }
}
