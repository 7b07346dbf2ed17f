// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Canonical forms of cones and semigroups under lattice equivalence.
//!
//! Two generator matrices are equivalent when a unimodular change of basis and
//! a reordering of generators carries one to the other. The canonical form picks
//! one representative per class, so graph nodes can be compared by equality.
//!
//! ## Algorithm
//!
//! 1. Reduce to an intrinsic generating set: primitive extreme rays for a cone,
//!    the minimal generating set for a semigroup.
//! 2. Pair every generator with every primitive facet normal. Generators are
//!    sorted into classes by invariants of this pairing matrix (see
//!    [`invariants::ColumnKey`] for the exact order).
//! 3. Among all column orders that list the classes in ascending order, take
//!    the one whose Hermite normal form is lexicographically smallest, read
//!    column by column. That Hermite form is the canonical form.
//!
//! Step 3 searches every admissible order (merging equivalent partial states),
//! so the form is exact for both variants: equal forms if and only if the inputs
//! are equivalent.

pub mod hermite;
pub mod invariants;

use crate::error::NashError;
use crate::geometry::GeometryEngine;
use crate::lattice::GeneratorMatrix;
use crate::validate::validate;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumString};
use tracing::trace;

/// Which kind of object a generator matrix describes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Normalized: columns are rays of a cone `σ` in N. Generators of `σ^∨`
    /// go through [`crate::blowup::cone_from_dual`] first.
    Cone,
    /// Non-normalized: columns generate a semigroup in M.
    Semigroup,
}

/// The canonical representative of a lattice-equivalence class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalForm(GeneratorMatrix);

impl CanonicalForm {
    pub fn matrix(&self) -> &GeneratorMatrix {
        &self.0
    }

    pub fn into_matrix(self) -> GeneratorMatrix {
        self.0
    }

    pub fn dim(&self) -> usize {
        self.0.dim()
    }

    /// Is this the smooth (unimodular) representative?
    pub fn is_identity(&self) -> bool {
        self.0 == GeneratorMatrix::identity(self.0.dim())
    }

    /// The canonical form of the smooth cone or semigroup of dimension `dim`.
    pub fn identity(dim: usize) -> Self {
        // The identity is already in minimal Hermite form
        CanonicalForm(GeneratorMatrix::identity(dim))
    }
}

impl fmt::Display for CanonicalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Canonical form of `matrix`, read as a cone or a semigroup.
///
/// Fails with `InvalidInput` if the matrix is not pointed and full-dimensional.
pub fn canonical_form(
    engine: &dyn GeometryEngine,
    variant: Variant,
    matrix: &GeneratorMatrix,
) -> Result<CanonicalForm, NashError> {
    let dim = matrix.dim();
    let facets = validate(engine, matrix)?;
    let generators = match variant {
        Variant::Cone => engine.extremal_rays(matrix.columns(), dim)?,
        Variant::Semigroup => engine.minimal_generators(matrix.columns(), dim)?,
    };
    let classes = invariants::column_classes(&facets, &generators);
    let columns = hermite::minimal_hermite_columns(&generators, &classes, dim)?;
    let form = CanonicalForm(GeneratorMatrix::from_columns(dim, columns)?);
    trace!(%variant, input = %matrix, canonical = %form, "canonical form");
    Ok(form)
}
