// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Generator matrices: the exchange form for cones and semigroups.
//!
//! Rows are lattice coordinate axes, columns are generators. Internally the
//! matrix is stored column-major because every algorithm consumes generators.
//!
//! # Serialization
//!
//! A matrix serializes as `{"rows": [[...], ...]}` and deserializes from either
//! that form or `{"columns": [[...], ...]}`:
//!
//! ```
//! use nash_blowup::lattice::GeneratorMatrix;
//!
//! let by_rows: GeneratorMatrix = serde_json::from_str(r#"{"rows": [[1, 0, 1], [0, 1, 2]]}"#).unwrap();
//! let by_columns: GeneratorMatrix =
//!     serde_json::from_str(r#"{"columns": [[1, 0], [0, 1], [1, 2]]}"#).unwrap();
//! assert_eq!(by_rows, by_columns);
//! assert_eq!(by_rows.dim(), 2);
//! assert_eq!(by_rows.len(), 3);
//! ```

use super::LatticeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An integer matrix whose columns generate a cone or a semigroup.
///
/// Value object: immutable once built. Equality, ordering and hashing are by
/// dimension and then by the exact column sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "MatrixRepr", into = "MatrixRepr")]
pub struct GeneratorMatrix {
    dim: usize,
    columns: Vec<Vec<i64>>,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum MatrixRepr {
    Rows { rows: Vec<Vec<i64>> },
    Columns { columns: Vec<Vec<i64>> },
}

impl TryFrom<MatrixRepr> for GeneratorMatrix {
    type Error = LatticeError;

    fn try_from(repr: MatrixRepr) -> Result<Self, Self::Error> {
        match repr {
            MatrixRepr::Rows { rows } => GeneratorMatrix::from_rows(rows),
            MatrixRepr::Columns { columns } => {
                let dim = columns.first().map(Vec::len).ok_or(LatticeError::Empty)?;
                GeneratorMatrix::from_columns(dim, columns)
            }
        }
    }
}

impl From<GeneratorMatrix> for MatrixRepr {
    fn from(matrix: GeneratorMatrix) -> Self {
        MatrixRepr::Rows {
            rows: matrix.rows(),
        }
    }
}

impl GeneratorMatrix {
    /// Build from generators. Every column must have `dim` entries.
    pub fn from_columns(dim: usize, columns: Vec<Vec<i64>>) -> Result<Self, LatticeError> {
        if dim == 0 {
            return Err(LatticeError::Empty);
        }
        for (i, column) in columns.iter().enumerate() {
            if column.len() != dim {
                return Err(LatticeError::Ragged {
                    row: i,
                    expected: dim,
                    found: column.len(),
                });
            }
        }
        Ok(Self { dim, columns })
    }

    /// Build from lattice axes (the exchange form).
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self, LatticeError> {
        let width = rows.first().map(Vec::len).ok_or(LatticeError::Empty)?;
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(LatticeError::Ragged {
                    row: i,
                    expected: width,
                    found: row.len(),
                });
            }
        }
        let columns = (0..width)
            .map(|j| rows.iter().map(|row| row[j]).collect())
            .collect();
        Self::from_columns(rows.len(), columns)
    }

    /// The standard basis e_1..e_d: the smooth cone and the smooth semigroup.
    pub fn identity(dim: usize) -> Self {
        let columns = (0..dim)
            .map(|i| (0..dim).map(|j| i64::from(i == j)).collect())
            .collect();
        Self { dim, columns }
    }

    /// Ambient lattice dimension (number of rows).
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of generators (columns).
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Vec<i64>] {
        &self.columns
    }

    pub fn column(&self, i: usize) -> &[i64] {
        &self.columns[i]
    }

    pub fn into_columns(self) -> Vec<Vec<i64>> {
        self.columns
    }

    /// Rows of the matrix (lattice axes).
    pub fn rows(&self) -> Vec<Vec<i64>> {
        (0..self.dim)
            .map(|i| self.columns.iter().map(|c| c[i]).collect())
            .collect()
    }

    /// Left-multiply by a square matrix given as rows: `U · self`.
    pub fn transform(&self, u: &[Vec<i64>]) -> Result<Self, LatticeError> {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                u.iter()
                    .map(|row| super::narrow(super::dot(row, c), "matrix transform"))
                    .collect::<Result<Vec<i64>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_columns(self.dim, columns)
    }

    /// Reorder the generators: column `i` of the result is column `order[i]` of `self`.
    pub fn permute(&self, order: &[usize]) -> Self {
        Self {
            dim: self.dim,
            columns: order.iter().map(|&i| self.columns[i].clone()).collect(),
        }
    }
}

impl fmt::Display for GeneratorMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "(")?;
            for (j, x) in column.iter().enumerate() {
                if j > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", x)?;
            }
            write!(f, ")")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_and_columns_agree() {
        let m = GeneratorMatrix::from_rows(vec![vec![1, 0, 2], vec![0, 1, 3]]).unwrap();
        assert_eq!(m.dim(), 2);
        assert_eq!(m.len(), 3);
        assert_eq!(m.column(2), &[2, 3]);
        assert_eq!(m.rows(), vec![vec![1, 0, 2], vec![0, 1, 3]]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = GeneratorMatrix::from_rows(vec![vec![1, 0], vec![0]]).unwrap_err();
        assert_eq!(
            err,
            LatticeError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            }
        );
        assert_eq!(GeneratorMatrix::from_rows(vec![]), Err(LatticeError::Empty));
    }

    #[test]
    fn test_identity() {
        let id = GeneratorMatrix::identity(3);
        assert_eq!(id.columns(), &[vec![1, 0, 0], vec![0, 1, 0], vec![0, 0, 1]]);
    }

    #[test]
    fn test_transform_and_permute() {
        let m = GeneratorMatrix::from_columns(2, vec![vec![1, 0], vec![1, 2]]).unwrap();
        let u = vec![vec![1, 1], vec![0, 1]];
        let t = m.transform(&u).unwrap();
        assert_eq!(t.columns(), &[vec![1, 0], vec![3, 2]]);
        assert_eq!(t.permute(&[1, 0]).columns(), &[vec![3, 2], vec![1, 0]]);
    }

    #[test]
    fn test_display() {
        let m = GeneratorMatrix::from_columns(2, vec![vec![1, 0], vec![1, -2]]).unwrap();
        assert_eq!(m.to_string(), "[(1,0), (1,-2)]");
    }

    #[test]
    fn test_serializes_as_rows() {
        let m = GeneratorMatrix::identity(2);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"rows":[[1,0],[0,1]]}"#);
        let back: GeneratorMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}
