// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Hilbert basis of a pointed rational cone.
//!
//! Every irreducible lattice point of the cone lies in some simplicial subcone
//! spanned by `dim` extreme rays, and there it is either one of those rays or a
//! point of the half-open fundamental parallelepiped. So the candidates are the
//! rays plus all parallelepiped points of all full-rank `dim`-subsets of rays,
//! and the Hilbert basis is the set of candidates `x` for which no other
//! candidate `y` has `x - y` in the cone.

use super::GeometryError;
use crate::lattice::{self, Combinations, LatticeError};
use num_traits::ToPrimitive;
use std::collections::BTreeSet;

/// Hilbert basis of the cone spanned by `rays`, whose inner facet normals are `facets`.
///
/// `rays` must be extreme rays of a pointed full-dimensional cone. The result is
/// sorted ascending. `limit` bounds the total number of parallelepiped points
/// examined.
pub(crate) fn hilbert_basis(
    rays: &[Vec<i64>],
    facets: &[Vec<i64>],
    dim: usize,
    limit: usize,
) -> Result<Vec<Vec<i64>>, GeometryError> {
    let mut candidates: BTreeSet<Vec<i64>> = rays.iter().cloned().collect();
    let mut examined = 0usize;

    for subset in Combinations::new(rays.len(), dim) {
        let columns: Vec<Vec<i64>> = subset.iter().map(|&i| rays[i].clone()).collect();
        let points = parallelepiped_points(&columns, dim, limit.saturating_sub(examined))?;
        examined += points.len();
        candidates.extend(points);
    }

    let in_cone = |v: &[i64]| facets.iter().all(|u| lattice::dot(u, v) >= 0);
    let candidates: Vec<Vec<i64>> = candidates.into_iter().collect();
    let mut basis = Vec::new();
    for x in &candidates {
        let reducible = candidates.iter().any(|y| {
            y != x
                && lattice::difference(x, y)
                    .map(|d| in_cone(&d))
                    .unwrap_or(false)
        });
        if !reducible {
            basis.push(x.clone());
        }
    }
    Ok(basis)
}

/// Nonzero lattice points `R·λ` with `0 <= λ_i < 1`, for the square matrix whose
/// columns are `columns`. Empty when the columns are dependent or unimodular.
fn parallelepiped_points(
    columns: &[Vec<i64>],
    dim: usize,
    budget: usize,
) -> Result<Vec<Vec<i64>>, GeometryError> {
    // Rows of R, where the generators are the columns
    let r: Vec<Vec<i64>> = (0..dim)
        .map(|i| columns.iter().map(|c| c[i]).collect())
        .collect();
    let (adj, det) = lattice::adjugate(&r)?;
    let det = det.to_i128().ok_or(LatticeError::Overflow("parallelepiped volume"))?;
    let volume = det.abs();
    if volume <= 1 {
        return Ok(Vec::new());
    }
    if volume as u128 > budget as u128 {
        return Err(GeometryError::TooLarge {
            what: "Hilbert basis candidates",
            limit: budget,
        });
    }
    let sign = det.signum();
    let moduli = triangular_diagonal(&r)?;

    let mut points = Vec::new();
    let mut representative = vec![0i128; dim];
    loop {
        // λ·det = adj(R)·x, reduced into [0, |det|)
        let mut nu = vec![0i128; dim];
        for i in 0..dim {
            let mu: i128 = (0..dim).map(|j| adj[i][j] as i128 * representative[j]).sum();
            nu[i] = (sign * mu).rem_euclid(volume);
        }
        if nu.iter().any(|&x| x != 0) {
            let mut point = Vec::with_capacity(dim);
            for row in &r {
                let scaled: i128 = row.iter().zip(&nu).map(|(&a, &b)| a as i128 * b).sum();
                debug_assert_eq!(scaled % volume, 0, "parallelepiped point is not integral");
                point.push(lattice::narrow(scaled / volume, "parallelepiped point")?);
            }
            points.push(point);
        }

        // Next coset representative, mixed radix over the diagonal
        let mut i = 0;
        loop {
            if i == dim {
                return Ok(points);
            }
            representative[i] += 1;
            if representative[i] < moduli[i] {
                break;
            }
            representative[i] = 0;
            i += 1;
        }
    }
}

/// Diagonal of a lower-triangular basis of the lattice spanned by the columns of `r`.
///
/// The boxes `0 <= x_i < diag_i` then form a complete set of coset
/// representatives of `Z^d / R·Z^d`.
fn triangular_diagonal(r: &[Vec<i64>]) -> Result<Vec<i128>, GeometryError> {
    let dim = r.len();
    let mut m: Vec<Vec<i128>> = r
        .iter()
        .map(|row| row.iter().map(|&x| x as i128).collect())
        .collect();
    let overflow = || LatticeError::Overflow("triangular basis");

    for i in 0..dim {
        for j in (i + 1)..dim {
            let a = m[i][i];
            let b = m[i][j];
            if b == 0 {
                continue;
            }
            let e = num_integer::Integer::extended_gcd(&a, &b);
            let (g, x, y) = (e.gcd, e.x, e.y);
            // Column ops: c_i <- x c_i + y c_j, c_j <- (-b/g) c_i + (a/g) c_j
            for row in m.iter_mut() {
                let ci = row[i];
                let cj = row[j];
                let new_i = x
                    .checked_mul(ci)
                    .zip(y.checked_mul(cj))
                    .and_then(|(p, q)| p.checked_add(q))
                    .ok_or_else(overflow)?;
                let new_j = (-b / g)
                    .checked_mul(ci)
                    .zip((a / g).checked_mul(cj))
                    .and_then(|(p, q)| p.checked_add(q))
                    .ok_or_else(overflow)?;
                row[i] = new_i;
                row[j] = new_j;
            }
        }
    }
    Ok((0..dim).map(|i| m[i][i].abs()).collect())
}
