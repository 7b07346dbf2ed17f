// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Exponents of the logarithmic Jacobian ideal.
//!
//! For a semigroup generated by `a_1..a_n` in `Z^d`, the logarithmic Jacobian
//! ideal is generated by the monomials `x^(a_i1 + ... + a_id)` over the
//! `d`-subsets whose determinant does not vanish in the base field.

use super::Characteristic;
use crate::error::NashError;
use crate::lattice::{self, Combinations};
use std::collections::BTreeSet;
use tracing::debug;

/// Distinct exponent sums over admissible `dim`-subsets of `generators`, sorted.
///
/// Fails with `InvalidInput` when no subset is admissible, which can only happen
/// in positive characteristic.
pub fn jacobian_exponents(
    generators: &[Vec<i64>],
    dim: usize,
    characteristic: Characteristic,
) -> Result<Vec<Vec<i64>>, NashError> {
    let mut exponents = BTreeSet::new();
    let mut rejected = 0usize;

    for subset in Combinations::new(generators.len(), dim) {
        let vectors: Vec<Vec<i64>> = subset.iter().map(|&i| generators[i].clone()).collect();
        if !characteristic.admits(&lattice::determinant(&vectors)) {
            rejected += 1;
            continue;
        }
        let mut total = vec![0i64; dim];
        for v in &vectors {
            total = lattice::sum(&total, v)?;
        }
        exponents.insert(total);
    }

    debug!(
        %characteristic,
        exponents = exponents.len(),
        rejected,
        "Jacobian exponents"
    );
    if exponents.is_empty() {
        return Err(NashError::invalid(format!(
            "no {}-subset of generators has a determinant that is nonzero in characteristic {}",
            dim, characteristic
        )));
    }
    Ok(exponents.into_iter().collect())
}
