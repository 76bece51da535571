use std::ops::Index;

use num_bigint::BigInt;
use num_traits::{One, Zero};
use rayon::iter::{IndexedParallelIterator, IntoParallelRefMutIterator, ParallelIterator};
use tracing::{debug, instrument};

use crate::cancel::CancelSignal;

// Matrix structure for 3x3 matrices, stored row-major
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matrix3 {
    rows: [[BigInt; 3]; 3],
}

impl Matrix3 {
    pub fn new(rows: [[BigInt; 3]; 3]) -> Self {
        Self { rows }
    }

    /// The tribonacci transformation matrix
    ///
    /// ```text
    /// [1 1 1]
    /// [1 0 0]
    /// [0 1 0]
    /// ```
    ///
    /// Built fresh on every call; the (n-3)-th power carries T(n) in its top-left cell.
    pub fn transformation() -> Self {
        let one = BigInt::one;
        let zero = BigInt::zero;
        Self::new([
            [one(), one(), one()],
            [one(), zero(), zero()],
            [zero(), one(), zero()],
        ])
    }

    pub fn identity() -> Self {
        Self::new(std::array::from_fn(|i| {
            std::array::from_fn(|j| if i == j { BigInt::one() } else { BigInt::zero() })
        }))
    }

    pub fn top_left(&self) -> &BigInt {
        &self.rows[0][0]
    }

    pub fn into_top_left(self) -> BigInt {
        let [[value, _, _], _, _] = self.rows;
        value
    }
}

impl Index<(usize, usize)> for Matrix3 {
    type Output = BigInt;

    fn index(&self, (i, j): (usize, usize)) -> &BigInt {
        &self.rows[i][j]
    }
}

// Dot product of row i of `a` with column j of `b`
fn cell(a: &Matrix3, b: &Matrix3, i: usize, j: usize) -> BigInt {
    (0..3).map(|k| &a.rows[i][k] * &b.rows[k][j]).sum()
}

// Matrix multiplication for 3x3 matrices
pub fn multiply(a: &Matrix3, b: &Matrix3) -> Matrix3 {
    Matrix3::new(std::array::from_fn(|i| {
        std::array::from_fn(|j| cell(a, b, i, j))
    }))
}

/// Multiplies two 3x3 matrices with every destination cell computed as its own rayon task.
///
/// Each task writes its own destination cell, so the only synchronisation is the join at the
/// end of `for_each`, which blocks until all nine products are in. Produces exactly the same
/// matrix as [`multiply`].
pub fn multiply_par(a: &Matrix3, b: &Matrix3) -> Matrix3 {
    let mut rows: [[BigInt; 3]; 3] = Default::default();

    rows.par_iter_mut().enumerate().for_each(|(i, row)| {
        row.par_iter_mut()
            .enumerate()
            .for_each(|(j, dst)| *dst = cell(a, b, i, j));
    });

    Matrix3::new(rows)
}

/// Outcome of [`power`].
#[derive(Debug)]
pub enum Power {
    /// `base^exp` (with `exp == 0` yielding `base`).
    Complete(Matrix3),
    /// The matrix held by the recursion level that observed the cancellation.
    /// It is not a meaningful power of anything and must be discarded.
    Interrupted(Matrix3),
}

impl Power {
    pub fn is_complete(&self) -> bool {
        matches!(self, Power::Complete(_))
    }

    pub fn into_complete(self) -> Option<Matrix3> {
        match self {
            Power::Complete(m) => Some(m),
            Power::Interrupted(_) => None,
        }
    }
}

/// Raises `base` to `exp` by recursive squaring, O(log exp) multiplications.
///
/// Exponents 0 and 1 both return `base` unchanged. Only `exp = n - 3` for n >= 3 ever
/// reaches here and T(3) = 1 sits in the top-left cell of both the identity and the
/// transformation matrix, so the merge is harmless for tribonacci.
///
/// `cancel` is polled on entry to every recursion level and again before every multiply, never
/// during one. Once it reads as set the recursion unwinds without issuing another multiplication.
#[instrument(skip_all, level = "debug", fields(exp = exp))]
pub fn power<M>(base: &Matrix3, exp: u64, multiply: M, cancel: &dyn CancelSignal) -> Power
where
    M: Fn(&Matrix3, &Matrix3) -> Matrix3 + Copy,
{
    let result = power_rec(base, exp, multiply, cancel);
    if !result.is_complete() {
        debug!(exp, "matrix power interrupted");
    }
    result
}

fn power_rec<M>(base: &Matrix3, exp: u64, multiply: M, cancel: &dyn CancelSignal) -> Power
where
    M: Fn(&Matrix3, &Matrix3) -> Matrix3 + Copy,
{
    if cancel.is_cancelled() {
        return Power::Interrupted(base.clone());
    }

    if exp <= 1 {
        return Power::Complete(base.clone());
    }

    let half = match power_rec(base, exp / 2, multiply, cancel) {
        Power::Complete(m) => m,
        interrupted => return interrupted,
    };

    if cancel.is_cancelled() {
        return Power::Interrupted(half);
    }
    let mut result = multiply(&half, &half);

    if exp % 2 == 1 {
        if cancel.is_cancelled() {
            return Power::Interrupted(result);
        }
        result = multiply(&result, base);
    }

    Power::Complete(result)
}
