// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Exact integer lattice primitives.
//!
//! Everything the blowup algorithm needs from linear algebra over Z lives here:
//! - `GeneratorMatrix`: the exchange form for cones and semigroups
//! - primitive-vector reduction, gcds and inner products (`vector`)
//! - arbitrary-precision rank, determinant and adjugate (`exact`)
//! - k-subset enumeration used by the Jacobian and Hilbert basis code (`combinations`)
//!
//! Vectors are stored as `Vec<i64>`. Intermediate products are formed in `i128`
//! and converted back with a checked conversion; anything that could grow without
//! bound (determinants, elimination) is done in `num_bigint::BigInt`.

pub mod combinations;
pub mod exact;
pub mod matrix;
pub mod vector;

pub use combinations::Combinations;
pub use exact::{adjugate, determinant, is_unimodular, rank};
pub use matrix::GeneratorMatrix;
pub use vector::{difference, dot, is_zero, narrow, primitive, primitive_wide, sum, vector_gcd};

use thiserror::Error;

/// Failures of the lattice layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LatticeError {
    /// An intermediate value no longer fits the storage type.
    #[error("integer overflow during {0}")]
    Overflow(&'static str),

    /// Rows of a matrix have different lengths.
    #[error("ragged matrix: row {row} has {found} entries, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A matrix with no rows (dimension zero) or no generators.
    #[error("matrix is empty")]
    Empty,
}
