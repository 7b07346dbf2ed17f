// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Minimal generating set of an affine semigroup.
//!
//! The semigroup lives in a pointed cone, so the sum of the primitive facet
//! normals is a grading that is strictly positive on every nonzero element.
//! Generators are taken in ascending degree; a generator is redundant exactly
//! when it is a nonnegative integer combination of minimal generators of
//! strictly smaller degree.

use super::GeometryError;
use crate::lattice;
use std::collections::{BTreeSet, HashSet};

/// Minimal generators, sorted ascending. `facets` are the inner facet normals of
/// the cone spanned by `generators`.
pub(crate) fn minimal_generators(
    generators: &[Vec<i64>],
    facets: &[Vec<i64>],
    dim: usize,
) -> Result<Vec<Vec<i64>>, GeometryError> {
    let grading = grading(facets, dim)?;
    let degree = |v: &[i64]| lattice::dot(&grading, v);

    let mut by_degree: Vec<(i128, Vec<i64>)> = generators
        .iter()
        .filter(|g| !lattice::is_zero(g))
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|g| (degree(&g), g))
        .collect();
    by_degree.sort();

    let mut minimal: Vec<(i128, Vec<i64>)> = Vec::new();
    for (d, g) in by_degree {
        if !representable(&g, d, &minimal, facets, &grading)? {
            minimal.push((d, g));
        }
    }

    let mut result: Vec<Vec<i64>> = minimal.into_iter().map(|(_, g)| g).collect();
    result.sort();
    Ok(result)
}

/// Sum of the primitive facet normals.
fn grading(facets: &[Vec<i64>], dim: usize) -> Result<Vec<i64>, GeometryError> {
    let mut w = vec![0i64; dim];
    for f in facets {
        w = lattice::sum(&w, f)?;
    }
    Ok(w)
}

/// Is `target` a sum of elements of `basis` whose degrees are below `degree`?
///
/// Depth-first search over remainders. Every step lowers the degree, so the
/// search is finite; remainders already explored are not revisited.
fn representable(
    target: &[i64],
    degree: i128,
    basis: &[(i128, Vec<i64>)],
    facets: &[Vec<i64>],
    grading: &[i64],
) -> Result<bool, GeometryError> {
    let in_cone = |v: &[i64]| facets.iter().all(|u| lattice::dot(u, v) >= 0);
    let mut explored: HashSet<Vec<i64>> = HashSet::new();
    let mut stack: Vec<Vec<i64>> = vec![target.to_vec()];

    while let Some(rest) = stack.pop() {
        let rest_degree = lattice::dot(grading, &rest);
        for (d, h) in basis {
            if *d >= degree || *d > rest_degree {
                continue;
            }
            let remainder = lattice::difference(&rest, h)?;
            if lattice::is_zero(&remainder) {
                return Ok(true);
            }
            if in_cone(&remainder) && explored.insert(remainder.clone()) {
                stack.push(remainder);
            }
        }
    }
    Ok(false)
}
