// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Non-normalized Nash blowup of an affine semigroup.
//!
//! No saturation: the Jacobian exponents come from the semigroup's own minimal
//! generators, and the chart at a vertex `v` of the Newton polyhedron is the
//! semigroup generated by the old generators together with every `m - v`.

use super::{jacobian::jacobian_exponents, BlowupStep, Characteristic};
use crate::error::NashError;
use crate::geometry::GeometryEngine;
use crate::lattice::{self, GeneratorMatrix};
use crate::normal_form::Variant;
use crate::validate::validate;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct NonNormalizedBlowup {
    characteristic: Characteristic,
}

impl NonNormalizedBlowup {
    pub fn new(characteristic: Characteristic) -> Self {
        Self { characteristic }
    }
}

impl BlowupStep for NonNormalizedBlowup {
    fn variant(&self) -> Variant {
        Variant::Semigroup
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
        validate(engine, matrix)?;
        let generators = engine.minimal_generators(matrix.columns(), dim)?;
        let exponents = jacobian_exponents(&generators, dim, self.characteristic)?;
        let polyhedron = engine.newton_polyhedron(&exponents, &generators, dim)?;
        debug!(
            semigroup = %matrix,
            generators = generators.len(),
            vertices = polyhedron.len(),
            "non-normalized blowup"
        );

        let mut children = Vec::with_capacity(polyhedron.len());
        for vertex in polyhedron.apexes() {
            let mut chart = generators.clone();
            for m in &exponents {
                let shifted = lattice::difference(m, vertex)?;
                if !lattice::is_zero(&shifted) {
                    chart.push(shifted);
                }
            }
            let minimal = engine.minimal_generators(&chart, dim)?;
            children.push(GeneratorMatrix::from_columns(dim, minimal)?);
        }
        Ok(children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ExactEngine;

    #[test]
    fn test_identity_blows_up_to_itself() {
        let children = NonNormalizedBlowup::default()
            .blowup(&ExactEngine::new(), &GeneratorMatrix::identity(2))
            .unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].columns(), &[vec![0, 1], vec![1, 0]]);
    }

    #[test]
    fn test_cusp_semigroup() {
        // Semigroup generated by (1,0),(1,1),(1,2): the A1 semigroup in M
        let m = GeneratorMatrix::from_columns(2, vec![vec![1, 0], vec![1, 1], vec![1, 2]]).unwrap();
        let children = NonNormalizedBlowup::default()
            .blowup(&ExactEngine::new(), &m)
            .unwrap();
        // Exponents (2,1),(2,2),(2,3); vertices (2,1),(2,3)
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].columns(), &[vec![0, 1], vec![1, 0]]);
        assert_eq!(children[1].columns(), &[vec![0, -1], vec![1, 2]]);
    }
}
