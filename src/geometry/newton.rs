// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Vertices and tangent cones of `P = conv(points) + cone(recession)`.
//!
//! `P` is homogenized to the cone `K` in dimension `dim + 1` spanned by the
//! `(m, 1)` and the `(r, 0)`. A facet `(a, b)` of `K` is tight at a point `p`
//! when `<a, p> + b = 0`. A point `p` is a vertex of `P` iff the facets tight
//! at `(p, 1)` have rank `dim`, and then the tangent cone of `P` at `p` is
//! `{ y : <a, y> >= 0 }` over those tight facets.

use super::{double_description::extreme_rays, GeometryError, NewtonPolyhedron, TangentCone};
use crate::lattice;
use std::collections::BTreeSet;
use tracing::trace;

pub(crate) fn newton_polyhedron(
    points: &[Vec<i64>],
    recession: &[Vec<i64>],
    dim: usize,
) -> Result<NewtonPolyhedron, GeometryError> {
    if points.is_empty() {
        return Err(GeometryError::Empty);
    }
    let recession_facets = extreme_rays(recession, dim)?;
    let candidates = undominated(points, &recession_facets)?;

    let mut generators: Vec<Vec<i64>> = candidates.iter().map(|p| homogenize(p, 1)).collect();
    generators.extend(recession.iter().map(|r| homogenize(r, 0)));
    let facets = extreme_rays(&generators, dim + 1)?;
    trace!(
        candidates = candidates.len(),
        facets = facets.len(),
        "homogenized Newton polyhedron"
    );

    let mut vertices = Vec::new();
    for p in candidates {
        let lifted = homogenize(&p, 1);
        let tight: Vec<&Vec<i64>> = facets
            .iter()
            .filter(|f| lattice::dot(f, &lifted) == 0)
            .collect();
        let tight_rows: Vec<Vec<i64>> = tight.iter().map(|f| f.to_vec()).collect();
        if lattice::rank(&tight_rows) < dim {
            continue;
        }
        let facet_normals: Vec<Vec<i64>> = tight
            .iter()
            .map(|f| lattice::primitive(&f[..dim]))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        vertices.push(TangentCone {
            apex: p,
            facet_normals,
        });
    }
    Ok(NewtonPolyhedron { vertices })
}

/// Distinct points `p` with no other point `q` such that `p - q` lies in the
/// recession cone. Only these can be vertices. Sorted ascending.
fn undominated(
    points: &[Vec<i64>],
    recession_facets: &[Vec<i64>],
) -> Result<Vec<Vec<i64>>, GeometryError> {
    let distinct: Vec<Vec<i64>> = points
        .iter()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let in_recession = |v: &[i64]| recession_facets.iter().all(|u| lattice::dot(u, v) >= 0);

    let mut kept = Vec::with_capacity(distinct.len());
    for p in &distinct {
        let mut dominated = false;
        for q in &distinct {
            if q != p && in_recession(&lattice::difference(p, q)?) {
                dominated = true;
                break;
            }
        }
        if !dominated {
            kept.push(p.clone());
        }
    }
    Ok(kept)
}

fn homogenize(v: &[i64], last: i64) -> Vec<i64> {
    let mut lifted = v.to_vec();
    lifted.push(last);
    lifted
}
