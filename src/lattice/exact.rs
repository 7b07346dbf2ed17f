// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Arbitrary-precision rank, determinant and adjugate.
//!
//! These run fraction-free (Bareiss) elimination over `BigInt`, so they never
//! overflow regardless of how large intermediate minors become.

use super::{narrow, LatticeError};
use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};

fn to_big(rows: &[Vec<i64>]) -> Vec<Vec<BigInt>> {
    rows.iter()
        .map(|row| row.iter().map(|&x| BigInt::from(x)).collect())
        .collect()
}

/// Determinant of a square matrix given as rows.
///
/// The empty (0×0) matrix has determinant 1.
pub fn determinant(rows: &[Vec<i64>]) -> BigInt {
    let n = rows.len();
    debug_assert!(rows.iter().all(|r| r.len() == n), "determinant of non-square matrix");
    let mut m = to_big(rows);
    let mut sign = BigInt::one();
    let mut previous = BigInt::one();

    for k in 0..n {
        // Find a nonzero pivot in column k
        let pivot = match (k..n).find(|&i| !m[i][k].is_zero()) {
            Some(p) => p,
            None => return BigInt::zero(),
        };
        if pivot != k {
            m.swap(pivot, k);
            sign = -sign;
        }
        for i in (k + 1)..n {
            for j in (k + 1)..n {
                let value = &m[i][j] * &m[k][k] - &m[i][k] * &m[k][j];
                m[i][j] = value / &previous;
            }
            m[i][k] = BigInt::zero();
        }
        previous = m[k][k].clone();
    }

    if n == 0 {
        return BigInt::one();
    }
    sign * &m[n - 1][n - 1]
}

/// Rank of a family of vectors (rows of the given matrix).
pub fn rank(vectors: &[Vec<i64>]) -> usize {
    let Some(width) = vectors.first().map(Vec::len) else {
        return 0;
    };
    let mut m = to_big(vectors);
    let mut r = 0;

    for col in 0..width {
        let Some(pivot) = (r..m.len()).find(|&i| !m[i][col].is_zero()) else {
            continue;
        };
        m.swap(pivot, r);
        for i in (r + 1)..m.len() {
            if m[i][col].is_zero() {
                continue;
            }
            let factor = m[i][col].clone();
            let lead = m[r][col].clone();
            for j in col..width {
                let value = &m[i][j] * &lead - &m[r][j] * &factor;
                m[i][j] = value;
            }
            reduce_row(&mut m[i]);
        }
        r += 1;
        if r == m.len() {
            break;
        }
    }
    r
}

fn reduce_row(row: &mut [BigInt]) {
    let g = row
        .iter()
        .fold(BigInt::zero(), |acc, x| num_integer::Integer::gcd(&acc, x));
    if g > BigInt::one() {
        for x in row.iter_mut() {
            *x = &*x / &g;
        }
    }
}

/// Adjugate of a square matrix, so that `rows · adj = det · I`.
///
/// Returns the adjugate (as rows) and the determinant.
pub fn adjugate(rows: &[Vec<i64>]) -> Result<(Vec<Vec<i64>>, BigInt), LatticeError> {
    let n = rows.len();
    let det = determinant(rows);
    let mut adj = vec![vec![0i64; n]; n];

    for i in 0..n {
        for j in 0..n {
            // adj[i][j] = (-1)^(i+j) * det(minor with row j and column i removed)
            let minor: Vec<Vec<i64>> = rows
                .iter()
                .enumerate()
                .filter(|&(r, _)| r != j)
                .map(|(_, row)| {
                    row.iter()
                        .enumerate()
                        .filter(|&(c, _)| c != i)
                        .map(|(_, &x)| x)
                        .collect()
                })
                .collect();
            let cofactor = determinant(&minor);
            let cofactor = if (i + j) % 2 == 0 { cofactor } else { -cofactor };
            let wide = cofactor.to_i128().ok_or(LatticeError::Overflow("adjugate"))?;
            adj[i][j] = narrow(wide, "adjugate")?;
        }
    }
    Ok((adj, det))
}

/// Is the determinant of these `n` vectors ±1?
pub fn is_unimodular(vectors: &[Vec<i64>]) -> bool {
    determinant(vectors).abs().is_one()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinant_small() {
        assert_eq!(determinant(&[]), BigInt::one());
        assert_eq!(determinant(&[vec![5]]), BigInt::from(5));
        assert_eq!(determinant(&[vec![0, 2], vec![1, -1]]), BigInt::from(-2));
        assert_eq!(
            determinant(&[vec![2, 0, 1], vec![1, 3, 2], vec![1, 1, 1]]),
            BigInt::from(0)
        );
    }

    #[test]
    fn test_determinant_needs_pivoting() {
        let m = vec![vec![0, 0, 1], vec![0, 1, 0], vec![1, 0, 0]];
        assert_eq!(determinant(&m), BigInt::from(-1));
    }

    #[test]
    fn test_rank() {
        assert_eq!(rank(&[]), 0);
        assert_eq!(rank(&[vec![1, 2, 3], vec![2, 4, 6]]), 1);
        assert_eq!(rank(&[vec![1, 0, 0], vec![0, 0, 1], vec![1, 0, 1]]), 2);
        assert_eq!(rank(&[vec![0, 0], vec![0, 0]]), 0);
        assert_eq!(
            rank(&[vec![1, 0, 0, 0], vec![0, 1, 0, 0], vec![0, 0, 1, 0], vec![2, 3, -2, -1]]),
            4
        );
    }

    #[test]
    fn test_adjugate_inverts() {
        let m = vec![vec![1, 0], vec![1, 2]];
        let (adj, det) = adjugate(&m).unwrap();
        assert_eq!(det, BigInt::from(2));
        assert_eq!(adj, vec![vec![2, 0], vec![-1, 1]]);
        for i in 0..2 {
            for j in 0..2 {
                let entry: i64 = (0..2).map(|k| m[i][k] * adj[k][j]).sum();
                assert_eq!(entry, if i == j { 2 } else { 0 });
            }
        }
    }

    #[test]
    fn test_unimodular() {
        assert!(is_unimodular(&[vec![1, 1], vec![0, 1]]));
        assert!(!is_unimodular(&[vec![1, 0], vec![1, 2]]));
    }
}
