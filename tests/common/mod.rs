// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use nash_blowup::geometry::{GeometryError, NewtonPolyhedron};
use nash_blowup::lattice::is_unimodular;
use nash_blowup::{ExactEngine, GeneratorMatrix, GeometryEngine};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Matrix from its generators; all generators must have the same length.
pub fn matrix(columns: &[&[i64]]) -> GeneratorMatrix {
    let dim = columns[0].len();
    GeneratorMatrix::from_columns(dim, columns.iter().map(|c| c.to_vec()).collect()).unwrap()
}

/// The A1 surface singularity, which resolves after one normalized blowup.
pub fn a1() -> GeneratorMatrix {
    matrix(&[&[1, 0], &[1, 2]])
}

/// The cyclic quotient surface singularity `1/n(1, q)`.
pub fn cyclic_quotient(n: i64, q: i64) -> GeneratorMatrix {
    matrix(&[&[0, 1], &[n, -q]])
}

/// A random unimodular matrix, as rows, built from elementary row operations.
pub fn random_unimodular(rng: &mut StdRng, dim: usize) -> Vec<Vec<i64>> {
    let mut u: Vec<Vec<i64>> = (0..dim)
        .map(|i| (0..dim).map(|j| i64::from(i == j)).collect())
        .collect();
    if dim < 2 {
        return u;
    }
    for _ in 0..4 * dim {
        let i = rng.gen_range(0..dim);
        let mut j = rng.gen_range(0..dim - 1);
        if j >= i {
            j += 1;
        }
        match rng.gen_range(0..3) {
            0 => u.swap(i, j),
            1 => u[i].iter_mut().for_each(|x| *x = -*x),
            _ => {
                let k = rng.gen_range(-2..=2);
                let source = u[j].clone();
                for (x, y) in u[i].iter_mut().zip(source) {
                    *x += k * y;
                }
            }
        }
    }
    debug_assert!(is_unimodular(&u));
    u
}

/// `U · X · P` for a random unimodular `U` and a random column permutation `P`.
pub fn scramble(rng: &mut StdRng, x: &GeneratorMatrix) -> GeneratorMatrix {
    let u = random_unimodular(rng, x.dim());
    let mut order: Vec<usize> = (0..x.len()).collect();
    order.shuffle(rng);
    x.transform(&u).unwrap().permute(&order)
}

/// Delegates to the exact engine, except that Newton polyhedra always fail.
#[derive(Debug, Default)]
pub struct BrokenNewtonEngine {
    inner: ExactEngine,
}

impl GeometryEngine for BrokenNewtonEngine {
    fn name(&self) -> &str {
        "broken-newton"
    }

    fn facets(&self, generators: &[Vec<i64>], dim: usize) -> Result<Vec<Vec<i64>>, GeometryError> {
        self.inner.facets(generators, dim)
    }

    fn hilbert_basis(
        &self,
        generators: &[Vec<i64>],
        dim: usize,
    ) -> Result<Vec<Vec<i64>>, GeometryError> {
        self.inner.hilbert_basis(generators, dim)
    }

    fn minimal_generators(
        &self,
        generators: &[Vec<i64>],
        dim: usize,
    ) -> Result<Vec<Vec<i64>>, GeometryError> {
        self.inner.minimal_generators(generators, dim)
    }

    fn newton_polyhedron(
        &self,
        _points: &[Vec<i64>],
        _recession: &[Vec<i64>],
        _dim: usize,
    ) -> Result<NewtonPolyhedron, GeometryError> {
        Err(GeometryError::Engine {
            engine: self.name().to_string(),
            message: "vertex enumeration unavailable".to_string(),
        })
    }
}
