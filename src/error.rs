// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Crate-level error type.

use crate::engine::BudgetLimit;
use crate::geometry::GeometryError;
use crate::lattice::LatticeError;
use thiserror::Error;

/// Errors returned by blowup steps and tree exploration.
#[derive(Debug, Error)]
pub enum NashError {
    /// The input matrix is not a pointed full-dimensional cone or semigroup, or a
    /// parameter is malformed. Nothing was computed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The geometry engine failed. Never to be read as "no children".
    #[error("geometry computation failed: {0}")]
    ExternalComputation(#[from] GeometryError),

    /// The exploration budget ran out. The caller's tree is marked incomplete and
    /// holds everything discovered so far.
    #[error("exploration budget exceeded ({limit}) after {expanded} expansions")]
    ResourceExceeded { limit: BudgetLimit, expanded: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl From<LatticeError> for NashError {
    fn from(err: LatticeError) -> Self {
        match err {
            LatticeError::Overflow(_) => NashError::ExternalComputation(err.into()),
            LatticeError::Ragged { .. } | LatticeError::Empty => {
                NashError::InvalidInput(err.to_string())
            }
        }
    }
}

impl NashError {
    pub fn invalid(message: impl Into<String>) -> Self {
        NashError::InvalidInput(message.into())
    }

    /// Budget exhaustion is recoverable; everything else is not.
    pub fn is_resource_exceeded(&self) -> bool {
        matches!(self, NashError::ResourceExceeded { .. })
    }
}
