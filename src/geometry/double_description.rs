// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Exact double description method.
//!
//! Computes the extreme rays of a polyhedral cone `{ y : <a_i, y> >= 0 }`.
//! Applied to the generators of a cone this yields its facet normals, and applied
//! to facet normals it yields extreme rays again, so one routine serves both
//! directions of the Minkowski–Weyl conversion.
//!
//! # Algorithm
//!
//! 1. Deduplicate the constraints (primitive, sorted) and pick `dim` linearly
//!    independent ones. The cone they cut out is simplicial; its rays are the
//!    columns of the adjugate of the basis matrix.
//! 2. Add the remaining constraints one at a time. Rays on the negative side are
//!    dropped; every adjacent (positive, negative) pair contributes the ray on
//!    the new hyperplane between them.
//! 3. Adjacency is decided combinatorially from zero sets: two rays are adjacent
//!    iff their common zero set has at least `dim - 2` rows and no third ray's
//!    zero set contains it.
//!
//! All arithmetic is exact; combinations are formed in `i128` and reduced to
//! primitive `i64` vectors after every step.

use super::{GeometryError, RowSet};
use crate::lattice::{self, LatticeError};
use std::collections::BTreeSet;
use tracing::trace;

#[derive(Debug, Clone)]
struct Ray {
    vector: Vec<i64>,
    zeros: RowSet,
}

/// Extreme rays of `{ y : <a, y> >= 0 for every a in constraints }`, primitive and sorted.
///
/// The constraints must span `dim` dimensions; otherwise the solution cone has
/// a lineality space and `NotFullDimensional` is returned.
pub(crate) fn extreme_rays(
    constraints: &[Vec<i64>],
    dim: usize,
) -> Result<Vec<Vec<i64>>, GeometryError> {
    if let Some(bad) = constraints.iter().find(|c| c.len() != dim) {
        return Err(GeometryError::DimensionMismatch {
            expected: dim,
            found: bad.len(),
        });
    }

    let rows: Vec<Vec<i64>> = constraints
        .iter()
        .filter(|c| !lattice::is_zero(c))
        .map(|c| lattice::primitive(c))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let basis = independent_rows(&rows, dim);
    if basis.len() < dim {
        return Err(GeometryError::NotFullDimensional {
            rank: basis.len(),
            dim,
        });
    }

    let mut rays = initial_rays(&rows, &basis, dim)?;
    let in_basis: BTreeSet<usize> = basis.iter().copied().collect();

    for k in (0..rows.len()).filter(|k| !in_basis.contains(k)) {
        rays = add_constraint(rays, &rows[k], k, dim)?;
        trace!(constraint = k, rays = rays.len(), "double description step");
    }

    Ok(rays
        .into_iter()
        .map(|r| r.vector)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect())
}

/// Greedy choice of linearly independent rows, in row order.
fn independent_rows(rows: &[Vec<i64>], dim: usize) -> Vec<usize> {
    let mut chosen: Vec<usize> = Vec::with_capacity(dim);
    let mut chosen_rows: Vec<Vec<i64>> = Vec::with_capacity(dim);
    for (i, row) in rows.iter().enumerate() {
        chosen_rows.push(row.clone());
        if lattice::rank(&chosen_rows) == chosen_rows.len() {
            chosen.push(i);
            if chosen.len() == dim {
                break;
            }
        } else {
            chosen_rows.pop();
        }
    }
    chosen
}

/// Rays of the simplicial cone cut out by the basis rows.
fn initial_rays(rows: &[Vec<i64>], basis: &[usize], dim: usize) -> Result<Vec<Ray>, GeometryError> {
    let matrix: Vec<Vec<i64>> = basis.iter().map(|&i| rows[i].clone()).collect();
    let (adj, det) = lattice::adjugate(&matrix)?;
    let sign: i64 = if det < num_bigint::BigInt::from(0) { -1 } else { 1 };

    let mut rays = Vec::with_capacity(dim);
    for j in 0..dim {
        let column: Vec<i64> = (0..dim).map(|i| sign * adj[i][j]).collect();
        let mut zeros = RowSet::with_capacity(rows.len());
        for (position, &row) in basis.iter().enumerate() {
            if position != j {
                zeros.insert(row);
            }
        }
        rays.push(Ray {
            vector: lattice::primitive(&column),
            zeros,
        });
    }
    Ok(rays)
}

fn add_constraint(
    rays: Vec<Ray>,
    row: &[i64],
    index: usize,
    dim: usize,
) -> Result<Vec<Ray>, GeometryError> {
    let values: Vec<i128> = rays.iter().map(|r| lattice::dot(row, &r.vector)).collect();
    let negative: Vec<usize> = (0..rays.len()).filter(|&i| values[i] < 0).collect();
    let positive: Vec<usize> = (0..rays.len()).filter(|&i| values[i] > 0).collect();

    let mut next: Vec<Ray> = Vec::with_capacity(rays.len());
    for p in &positive {
        next.push(rays[*p].clone());
    }
    for (i, ray) in rays.iter().enumerate() {
        if values[i] == 0 {
            let mut ray = ray.clone();
            ray.zeros.insert(index);
            next.push(ray);
        }
    }
    if negative.is_empty() {
        return Ok(next);
    }

    for &p in &positive {
        for &n in &negative {
            let common = rays[p].zeros.intersection(&rays[n].zeros);
            if common.len() + 2 < dim {
                continue;
            }
            let blocked = rays
                .iter()
                .enumerate()
                .any(|(r, ray)| r != p && r != n && common.is_subset(&ray.zeros));
            if blocked {
                continue;
            }

            let vp = values[p];
            let vn = values[n];
            let combined = rays[n]
                .vector
                .iter()
                .zip(&rays[p].vector)
                .map(|(&yn, &yp)| {
                    let a = vp.checked_mul(yn as i128);
                    let b = vn.checked_mul(yp as i128);
                    match (a, b) {
                        (Some(a), Some(b)) => a.checked_sub(b),
                        _ => None,
                    }
                    .ok_or(LatticeError::Overflow("double description combination"))
                })
                .collect::<Result<Vec<i128>, _>>()?;

            let mut zeros = common;
            zeros.insert(index);
            next.push(Ray {
                vector: lattice::primitive_wide(&combined)?,
                zeros,
            });
        }
    }
    Ok(next)
}
