// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Normalized Nash blowup of a cone.
//!
//! For a cone `σ` in `N`, the exponent semigroup is `σ^∨ ∩ M`, generated by the
//! Hilbert basis of `σ^∨`. The Newton polyhedron of the Jacobian exponents has
//! recession cone `σ^∨`; the normalized chart at a vertex is the dual of its
//! tangent cone, i.e. the cone spanned by the normals of the facets through it.
//!
//! Inputs are rays of `σ`. A cone known through generators of `σ^∨` (the
//! exponents of its monomials) is converted first with [`cone_from_dual`].

use super::{jacobian::jacobian_exponents, BlowupStep, Characteristic};
use crate::error::NashError;
use crate::geometry::GeometryEngine;
use crate::lattice::GeneratorMatrix;
use crate::normal_form::Variant;
use crate::validate::validate;
use tracing::debug;

/// The cone `σ` whose dual `σ^∨` is spanned by the columns of `dual`.
///
/// Its rays are the primitive facet normals of `cone(dual)`. Fails with
/// `InvalidInput` unless `dual` is pointed and full-dimensional.
pub fn cone_from_dual(
    engine: &dyn GeometryEngine,
    dual: &GeneratorMatrix,
) -> Result<GeneratorMatrix, NashError> {
    let rays = validate(engine, dual)?;
    Ok(GeneratorMatrix::from_columns(dual.dim(), rays)?)
}

#[derive(Debug, Clone, Default)]
pub struct NormalizedBlowup {
    characteristic: Characteristic,
}

impl NormalizedBlowup {
    pub fn new(characteristic: Characteristic) -> Self {
        Self { characteristic }
    }
}

impl BlowupStep for NormalizedBlowup {
    fn variant(&self) -> Variant {
        Variant::Cone
    }

    fn characteristic(&self) -> Characteristic {
        self.characteristic
    }

    fn blowup(
        &self,
        engine: &dyn GeometryEngine,
        matrix: &GeneratorMatrix,
    ) -> Result<Vec<GeneratorMatrix>, NashError> {
        let dim = matrix.dim();
        // Facets of σ are the rays of σ^∨
        let dual_rays = validate(engine, matrix)?;
        let basis = engine.hilbert_basis(&dual_rays, dim)?;
        let exponents = jacobian_exponents(&basis, dim, self.characteristic)?;
        let polyhedron = engine.newton_polyhedron(&exponents, &dual_rays, dim)?;
        debug!(
            cone = %matrix,
            hilbert_basis = basis.len(),
            vertices = polyhedron.len(),
            "normalized blowup"
        );

        polyhedron
            .vertices
            .into_iter()
            .map(|vertex| {
                GeneratorMatrix::from_columns(dim, vertex.facet_normals).map_err(NashError::from)
            })
            .collect()
    }
}
