// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Integer vector helpers.
//!
//! # Examples
//!
//! ```
//! use nash_blowup::lattice::{primitive, vector_gcd};
//!
//! assert_eq!(vector_gcd(&[4, -6, 8]), 2);
//! assert_eq!(primitive(&[4, -6, 8]), vec![2, -3, 4]);
//! assert_eq!(primitive(&[0, 0]), vec![0, 0]);
//! ```

use super::LatticeError;
use num_integer::Integer;

/// Non-negative gcd of all entries (0 for the zero vector).
pub fn vector_gcd(v: &[i64]) -> i64 {
    v.iter().fold(0i64, |acc, &x| acc.gcd(&x))
}

/// Divide a vector by the gcd of its entries.
///
/// The zero vector is returned unchanged.
pub fn primitive(v: &[i64]) -> Vec<i64> {
    let g = vector_gcd(v);
    if g <= 1 {
        return v.to_vec();
    }
    v.iter().map(|&x| x / g).collect()
}

/// Primitive reduction of a wide vector, narrowed back to `i64`.
pub fn primitive_wide(v: &[i128]) -> Result<Vec<i64>, LatticeError> {
    let g = v.iter().fold(0i128, |acc, &x| acc.gcd(&x));
    let g = if g == 0 { 1 } else { g };
    v.iter().map(|&x| narrow(x / g, "primitive reduction")).collect()
}

/// Checked conversion from `i128` to `i64`.
pub fn narrow(x: i128, context: &'static str) -> Result<i64, LatticeError> {
    i64::try_from(x).map_err(|_| LatticeError::Overflow(context))
}

/// Inner product, widened so it cannot overflow for `i64` inputs of moderate length.
pub fn dot(a: &[i64], b: &[i64]) -> i128 {
    debug_assert_eq!(a.len(), b.len(), "inner product of vectors of different length");
    a.iter().zip(b).map(|(&x, &y)| x as i128 * y as i128).sum()
}

pub fn is_zero(v: &[i64]) -> bool {
    v.iter().all(|&x| x == 0)
}

/// `a - b`, checked.
pub fn difference(a: &[i64], b: &[i64]) -> Result<Vec<i64>, LatticeError> {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| x.checked_sub(y).ok_or(LatticeError::Overflow("vector difference")))
        .collect()
}

/// `a + b`, checked.
pub fn sum(a: &[i64], b: &[i64]) -> Result<Vec<i64>, LatticeError> {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| x.checked_add(y).ok_or(LatticeError::Overflow("vector sum")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gcd_ignores_signs() {
        assert_eq!(vector_gcd(&[-3, 9, 0]), 3);
        assert_eq!(vector_gcd(&[0, 0, 0]), 0);
        assert_eq!(vector_gcd(&[7]), 7);
    }

    #[test]
    fn test_primitive_keeps_direction() {
        assert_eq!(primitive(&[-2, 4]), vec![-1, 2]);
        assert_eq!(primitive(&[1, 3, -1, -1]), vec![1, 3, -1, -1]);
    }

    #[test]
    fn test_primitive_wide_narrows() {
        let big = (i64::MAX as i128) * 2;
        assert_eq!(primitive_wide(&[big, 0]).unwrap(), vec![1, 0]);
        assert_eq!(
            primitive_wide(&[big, 1]),
            Err(LatticeError::Overflow("primitive reduction"))
        );
    }

    #[test]
    fn test_dot_and_difference() {
        assert_eq!(dot(&[1, 2, 3], &[4, -5, 6]), 12);
        assert_eq!(difference(&[3, 1], &[1, 1]).unwrap(), vec![2, 0]);
        assert_eq!(sum(&[3, 1], &[1, 1]).unwrap(), vec![4, 2]);
        assert!(is_zero(&[0, 0]));
    }
}
