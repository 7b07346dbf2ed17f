// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! One step of the Nash blowup, for cones and for semigroups.
//!
//! Both variants follow the same outline:
//! 1. take a generating set of the semigroup of exponents,
//! 2. form the exponents of the logarithmic Jacobian ideal ([`jacobian`]),
//! 3. build the Newton polyhedron of that ideal,
//! 4. emit one child per vertex, read off from its tangent cone.
//!
//! [`NormalizedBlowup`] saturates first (Hilbert basis of the dual cone) and
//! returns cones; [`NonNormalizedBlowup`] works on the semigroup's own
//! generators and returns semigroups. Children are not canonicalized here.

pub mod cone;
pub mod jacobian;
pub mod semigroup;

pub use cone::{cone_from_dual, NormalizedBlowup};
pub use semigroup::NonNormalizedBlowup;

use crate::error::NashError;
use crate::geometry::GeometryEngine;
use crate::lattice::GeneratorMatrix;
use crate::normal_form::Variant;
use num_bigint::BigInt;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Characteristic of the base field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Characteristic {
    #[default]
    Zero,
    Prime(u32),
}

impl Characteristic {
    /// Positive characteristic `p`; `p` must be prime.
    pub fn prime(p: u32) -> Result<Self, NashError> {
        if is_prime(p) {
            Ok(Characteristic::Prime(p))
        } else {
            Err(NashError::invalid(format!("characteristic {} is not prime", p)))
        }
    }

    /// Does a determinant survive in this characteristic?
    pub fn admits(&self, determinant: &BigInt) -> bool {
        match self {
            Characteristic::Zero => !determinant.is_zero(),
            Characteristic::Prime(p) => !(determinant % BigInt::from(*p)).is_zero(),
        }
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Characteristic::Zero => write!(f, "0"),
            Characteristic::Prime(p) => write!(f, "{}", p),
        }
    }
}

impl FromStr for Characteristic {
    type Err = NashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let p: u32 = s
            .trim()
            .parse()
            .map_err(|_| NashError::invalid(format!("characteristic {:?} is not a number", s)))?;
        if p == 0 {
            Ok(Characteristic::Zero)
        } else {
            Characteristic::prime(p)
        }
    }
}

fn is_prime(p: u32) -> bool {
    if p < 2 {
        return false;
    }
    let p = p as u64;
    (2..).take_while(|d| d * d <= p).all(|d| p % d != 0)
}

/// A single Nash blowup step.
pub trait BlowupStep: fmt::Debug + Send + Sync {
    fn variant(&self) -> Variant;

    fn characteristic(&self) -> Characteristic;

    /// Children of `matrix`, one per vertex of the Newton polyhedron, in vertex order.
    ///
    /// Fails with `InvalidInput` if `matrix` is not pointed and full-dimensional,
    /// and with `ExternalComputation` if the geometry engine fails.
    fn blowup(
        &self,
        engine: &dyn GeometryEngine,
        matrix: &GeneratorMatrix,
    ) -> Result<Vec<GeneratorMatrix>, NashError>;
}

/// The blowup step for `variant` in `characteristic`.
pub fn step_for(variant: Variant, characteristic: Characteristic) -> Box<dyn BlowupStep> {
    match variant {
        Variant::Cone => Box::new(NormalizedBlowup::new(characteristic)),
        Variant::Semigroup => Box::new(NonNormalizedBlowup::new(characteristic)),
    }
}
