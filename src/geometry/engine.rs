// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The default geometry engine: exact integer arithmetic throughout.

use super::{
    check_dimensions, double_description, hilbert, minimal, newton, GeometryEngine, GeometryError,
    NewtonPolyhedron,
};
use tracing::debug;

/// Default bound on Hilbert basis candidates.
pub const DEFAULT_MAX_CANDIDATES: usize = 1_000_000;

/// Exact double description, parallelepiped Hilbert bases and grading-ordered
/// semigroup reduction.
#[derive(Debug, Clone)]
pub struct ExactEngine {
    max_candidates: usize,
}

impl Default for ExactEngine {
    fn default() -> Self {
        Self {
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }
}

impl ExactEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the number of lattice points examined per Hilbert basis.
    pub fn with_max_candidates(max_candidates: usize) -> Self {
        Self { max_candidates }
    }
}

impl GeometryEngine for ExactEngine {
    fn name(&self) -> &str {
        "exact-double-description"
    }

    fn facets(&self, generators: &[Vec<i64>], dim: usize) -> Result<Vec<Vec<i64>>, GeometryError> {
        check_dimensions(generators, dim)?;
        double_description::extreme_rays(generators, dim)
    }

    fn hilbert_basis(
        &self,
        generators: &[Vec<i64>],
        dim: usize,
    ) -> Result<Vec<Vec<i64>>, GeometryError> {
        let facets = self.facets(generators, dim)?;
        let rays = self.facets(&facets, dim)?;
        let basis = hilbert::hilbert_basis(&rays, &facets, dim, self.max_candidates)?;
        debug!(rays = rays.len(), basis = basis.len(), "Hilbert basis");
        Ok(basis)
    }

    fn minimal_generators(
        &self,
        generators: &[Vec<i64>],
        dim: usize,
    ) -> Result<Vec<Vec<i64>>, GeometryError> {
        let facets = self.facets(generators, dim)?;
        // Rank check: the facets of a pointed cone span the dual space
        self.facets(&facets, dim)?;
        minimal::minimal_generators(generators, &facets, dim)
    }

    fn newton_polyhedron(
        &self,
        points: &[Vec<i64>],
        recession: &[Vec<i64>],
        dim: usize,
    ) -> Result<NewtonPolyhedron, GeometryError> {
        check_dimensions(points, dim)?;
        check_dimensions(recession, dim)?;
        newton::newton_polyhedron(points, recession, dim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extremal_rays_drop_interior_generators() {
        let engine = ExactEngine::new();
        let rays = engine
            .extremal_rays(&[vec![1, 0], vec![1, 1], vec![2, 4], vec![1, 2]], 2)
            .unwrap();
        assert_eq!(rays, vec![vec![1, 0], vec![1, 2]]);
    }

    #[test]
    fn test_hilbert_basis_of_a1() {
        let engine = ExactEngine::new();
        let basis = engine.hilbert_basis(&[vec![2, -1], vec![0, 1]], 2).unwrap();
        assert_eq!(basis, vec![vec![0, 1], vec![1, 0], vec![2, -1]]);
    }

    #[test]
    fn test_minimal_generators_reject_non_pointed() {
        let engine = ExactEngine::new();
        let err = engine
            .minimal_generators(&[vec![1, 0], vec![-1, 0], vec![0, 1]], 2)
            .unwrap_err();
        assert!(matches!(err, GeometryError::NotFullDimensional { rank: 1, dim: 2 }));
    }

    #[test]
    fn test_dimension_mismatch() {
        let engine = ExactEngine::new();
        let err = engine.facets(&[vec![1, 0, 0]], 2).unwrap_err();
        assert_eq!(
            err,
            GeometryError::DimensionMismatch {
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn test_candidate_limit() {
        let engine = ExactEngine::with_max_candidates(3);
        let err = engine.hilbert_basis(&[vec![1, 0], vec![1, 7]], 2).unwrap_err();
        assert!(matches!(err, GeometryError::TooLarge { .. }));
    }
}
