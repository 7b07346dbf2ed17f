// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Convex geometry needed by the blowup: facets, extreme rays, Hilbert bases,
//! minimal generating sets and Newton polyhedra.
//!
//! The blowup and normal form code only talk to the [`GeometryEngine`] trait.
//! [`ExactEngine`] implements it with exact integer arithmetic:
//! - `double_description`: Minkowski–Weyl conversion between generators and facets
//! - `hilbert`: Hilbert basis from fundamental parallelepipeds
//! - `minimal`: minimal generating set of a (non-saturated) affine semigroup
//! - `newton`: vertices and tangent cones of `conv(points) + cone(recession)`
//!
//! # Ordering contract
//!
//! Every vector list returned by an engine is sorted ascending lexicographically,
//! and every result depends only on the *set* of input vectors. Downstream
//! canonicalization relies on this.
//!
//! # Errors
//!
//! Engine failures are reported as [`GeometryError`] and must be propagated. An
//! empty result is a legitimate answer, never a failure signal.

pub mod double_description;
pub mod engine;
pub mod hilbert;
pub mod minimal;
pub mod newton;
pub mod row_set;

pub use engine::ExactEngine;
pub use row_set::RowSet;

use crate::lattice::{self, LatticeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failures of a geometry engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error(transparent)]
    Lattice(#[from] LatticeError),

    /// The input does not span the ambient space, or spans a cone with a lineality space.
    #[error("not full-dimensional: rank {rank} in dimension {dim}")]
    NotFullDimensional { rank: usize, dim: usize },

    #[error("vector of length {found} in a {expected}-dimensional computation")]
    DimensionMismatch { expected: usize, found: usize },

    /// A computation would exceed its configured size limit.
    #[error("too many {what} (limit {limit})")]
    TooLarge { what: &'static str, limit: usize },

    /// Failure reported by an engine implementation.
    #[error("{engine}: {message}")]
    Engine { engine: String, message: String },

    #[error("no input vectors")]
    Empty,
}

/// The local cone of a polyhedron at one of its vertices.
///
/// `{ y : <a, y> >= 0 for a in facet_normals }`, translated to `apex`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TangentCone {
    pub apex: Vec<i64>,
    /// Primitive inner normals of the facets through the apex, sorted.
    pub facet_normals: Vec<Vec<i64>>,
}

impl TangentCone {
    /// Does the direction `y` point into the polyhedron from the apex?
    pub fn contains_direction(&self, y: &[i64]) -> bool {
        self.facet_normals.iter().all(|a| lattice::dot(a, y) >= 0)
    }
}

/// Vertices of `conv(points) + cone(recession)`, each with its tangent cone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewtonPolyhedron {
    /// Sorted by apex.
    pub vertices: Vec<TangentCone>,
}

impl NewtonPolyhedron {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn apexes(&self) -> impl Iterator<Item = &[i64]> + '_ {
        self.vertices.iter().map(|v| v.apex.as_slice())
    }
}

/// The convex geometry operations the blowup needs.
///
/// Implementations must honour the ordering contract described in the module
/// documentation, and must report failures rather than returning partial results.
pub trait GeometryEngine: fmt::Debug + Send + Sync {
    /// Short identifier used in logs and error messages.
    fn name(&self) -> &str;

    /// Primitive inner facet normals of `cone(generators)` in `Z^dim`.
    fn facets(&self, generators: &[Vec<i64>], dim: usize) -> Result<Vec<Vec<i64>>, GeometryError>;

    /// Primitive extreme rays of the pointed cone `cone(generators)`.
    fn extremal_rays(
        &self,
        generators: &[Vec<i64>],
        dim: usize,
    ) -> Result<Vec<Vec<i64>>, GeometryError> {
        let facets = self.facets(generators, dim)?;
        self.facets(&facets, dim)
    }

    /// Hilbert basis of the lattice points of the pointed cone `cone(generators)`.
    fn hilbert_basis(
        &self,
        generators: &[Vec<i64>],
        dim: usize,
    ) -> Result<Vec<Vec<i64>>, GeometryError>;

    /// Minimal generating set of the semigroup generated by `generators`.
    ///
    /// The generators must span a pointed cone. Zero vectors are ignored.
    fn minimal_generators(
        &self,
        generators: &[Vec<i64>],
        dim: usize,
    ) -> Result<Vec<Vec<i64>>, GeometryError>;

    /// Vertices and tangent cones of `conv(points) + cone(recession)`.
    ///
    /// `recession` must span a pointed full-dimensional cone.
    fn newton_polyhedron(
        &self,
        points: &[Vec<i64>],
        recession: &[Vec<i64>],
        dim: usize,
    ) -> Result<NewtonPolyhedron, GeometryError>;
}

pub(crate) fn check_dimensions(vectors: &[Vec<i64>], dim: usize) -> Result<(), GeometryError> {
    match vectors.iter().find(|v| v.len() != dim) {
        Some(bad) => Err(GeometryError::DimensionMismatch {
            expected: dim,
            found: bad.len(),
        }),
        None => Ok(()),
    }
}
