// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Blowup eligibility: a generator matrix must span a pointed, full-dimensional cone.

use crate::error::NashError;
use crate::geometry::GeometryEngine;
use crate::lattice::{self, GeneratorMatrix};

/// Check that `matrix` is blowup-eligible and return the facet normals of its cone.
///
/// Fails with `InvalidInput` when the matrix has no generators, has a zero
/// generator, has rank below its dimension, or contains a line.
pub fn validate(
    engine: &dyn GeometryEngine,
    matrix: &GeneratorMatrix,
) -> Result<Vec<Vec<i64>>, NashError> {
    let dim = matrix.dim();
    if matrix.is_empty() {
        return Err(NashError::invalid("matrix has no generators"));
    }
    if let Some(i) = matrix.columns().iter().position(|c| lattice::is_zero(c)) {
        return Err(NashError::invalid(format!("generator {} is zero", i)));
    }
    let rank = lattice::rank(matrix.columns());
    if rank < dim {
        return Err(NashError::invalid(format!(
            "generators have rank {} in dimension {}",
            rank, dim
        )));
    }
    let facets = engine.facets(matrix.columns(), dim)?;
    let pointed_rank = lattice::rank(&facets);
    if pointed_rank < dim {
        return Err(NashError::invalid(format!(
            "cone is not pointed: lineality space of dimension {}",
            dim - pointed_rank
        )));
    }
    Ok(facets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ExactEngine;

    fn check(columns: Vec<Vec<i64>>) -> Result<Vec<Vec<i64>>, NashError> {
        let dim = columns[0].len();
        let m = GeneratorMatrix::from_columns(dim, columns).unwrap();
        validate(&ExactEngine::new(), &m)
    }

    #[test]
    fn test_accepts_a1() {
        let facets = check(vec![vec![1, 0], vec![1, 2]]).unwrap();
        assert_eq!(facets, vec![vec![0, 1], vec![2, -1]]);
    }

    #[test]
    fn test_rejects_low_rank() {
        let err = check(vec![vec![1, 0, 0], vec![0, 1, 0]]).unwrap_err();
        assert!(matches!(err, NashError::InvalidInput(ref m) if m.contains("rank 2")));
    }

    #[test]
    fn test_rejects_line() {
        let err = check(vec![vec![1, 0], vec![-1, 0], vec![0, 1]]).unwrap_err();
        assert!(matches!(err, NashError::InvalidInput(ref m) if m.contains("not pointed")));
    }

    #[test]
    fn test_rejects_zero_generator() {
        let err = check(vec![vec![1, 0], vec![0, 0], vec![0, 1]]).unwrap_err();
        assert!(matches!(err, NashError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_empty() {
        let m = GeneratorMatrix::from_columns(2, vec![]).unwrap();
        let err = validate(&ExactEngine::new(), &m).unwrap_err();
        assert!(matches!(err, NashError::InvalidInput(_)));
    }
}
