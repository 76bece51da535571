use num_bigint::BigInt;
use num_traits::{One, Zero};
use tokio::task::{self, JoinError};
use tracing::instrument;

use crate::cancel::{CancelSignal, CancellationToken, Never};
use crate::math::{multiply, multiply_par, power, Matrix3};

#[derive(Debug, thiserror::Error)]
pub enum TribonacciError {
    #[error("invalid index {0}: must be >= 1")]
    InvalidIndex(i64),
    #[error("calculation was interrupted")]
    Interrupted,
    #[error("Tokio Join error: {0:?}")]
    TokioJoin(#[from] JoinError),
}

fn check_index(n: i64) -> Result<(), TribonacciError> {
    if n <= 0 {
        return Err(TribonacciError::InvalidIndex(n));
    }
    Ok(())
}

/// Computes the `n`-th tribonacci number (1-based, seeded 0, 0, 1) with a linear sweep.
///
/// Keeps only the three most recent terms, sliding the window forward once per term,
/// so it performs n - 3 big-integer additions for n > 3.
///
/// # Errors
/// [`TribonacciError::InvalidIndex`] when `n <= 0`.
///
/// # Example
/// ```
/// use tribonacci::tribonacci::linear_tribonacci;
/// use num_bigint::BigInt;
/// assert_eq!(linear_tribonacci(10).unwrap(), BigInt::from(44u32));
/// ```
#[instrument(level = "debug")]
pub fn linear_tribonacci(n: i64) -> Result<BigInt, TribonacciError> {
    check_index(n)?;

    let (mut a, mut b, mut c) = (BigInt::zero(), BigInt::zero(), BigInt::one());
    match n {
        1 => return Ok(a),
        2 => return Ok(b),
        3 => return Ok(c),
        _ => {}
    }

    for _ in 3..n {
        let next = &a + &b + &c;
        a = b;
        b = c;
        c = next;
    }

    Ok(c)
}

/// Generates the first `limit` tribonacci numbers, T(1) through T(limit).
///
/// # Example
/// ```
/// use tribonacci::seq_linear;
/// use num_bigint::BigInt;
/// let seq = seq_linear(10);
/// assert_eq!(seq[9], BigInt::from(44u32));
/// ```
pub fn seq_linear(limit: usize) -> Vec<BigInt> {
    let mut trib_sequence = Vec::with_capacity(limit);
    let seeds = [BigInt::zero(), BigInt::zero(), BigInt::one()];
    trib_sequence.extend(seeds.into_iter().take(limit));
    for i in 3..limit {
        let next_value =
            &trib_sequence[i - 1] + &trib_sequence[i - 2] + &trib_sequence[i - 3];
        trib_sequence.push(next_value);
    }
    trib_sequence
}

// Shared body of the matrix entry points, parameterised over the multiplication kernel
fn matrix_with<M>(n: i64, cancel: &dyn CancelSignal, multiply: M) -> Result<BigInt, TribonacciError>
where
    M: Fn(&Matrix3, &Matrix3) -> Matrix3 + Copy,
{
    check_index(n)?;

    // T(1) and T(2) are not reachable through the matrix formula
    if n <= 2 {
        return Ok(BigInt::zero());
    }

    let exp = (n - 3) as u64;
    power(&Matrix3::transformation(), exp, multiply, cancel)
        .into_complete()
        .map(Matrix3::into_top_left)
        .ok_or(TribonacciError::Interrupted)
}

/// Computes the `n`-th tribonacci number by raising the transformation matrix to `n - 3`.
///
/// When `cancel` is given it is polled before every level of the exponentiation and before
/// every matrix product. If it is raised the result is [`TribonacciError::Interrupted`]; nothing computed so far is returned.
///
/// # Errors
/// [`TribonacciError::InvalidIndex`] when `n <= 0`, [`TribonacciError::Interrupted`] on
/// cancellation.
///
/// # Example
/// ```
/// use tribonacci::tribonacci::matrix_tribonacci;
/// use num_bigint::BigInt;
/// assert_eq!(matrix_tribonacci(20, None).unwrap(), BigInt::from(19513u32));
/// ```
#[instrument(skip(cancel), level = "debug")]
pub fn matrix_tribonacci(
    n: i64,
    cancel: Option<&dyn CancelSignal>,
) -> Result<BigInt, TribonacciError> {
    matrix_with(n, cancel.unwrap_or(&Never), multiply)
}

/// Same as [`matrix_tribonacci`], but every matrix product fans its nine cells out over rayon.
#[instrument(skip(cancel), level = "debug")]
pub fn matrix_tribonacci_rayon(
    n: i64,
    cancel: Option<&dyn CancelSignal>,
) -> Result<BigInt, TribonacciError> {
    matrix_with(n, cancel.unwrap_or(&Never), multiply_par)
}

/// Runs [`matrix_tribonacci`] on Tokio's blocking pool.
///
/// The token can be cancelled from any task while the computation is in flight; the
/// multiply already running finishes and no further one is started.
pub async fn matrix_tribonacci_tokio(
    n: i64,
    cancel: CancellationToken,
) -> Result<BigInt, TribonacciError> {
    task::spawn_blocking(move || matrix_tribonacci(n, Some(&cancel))).await?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_seeds() {
        assert_eq!(linear_tribonacci(1).unwrap(), BigInt::zero());
        assert_eq!(linear_tribonacci(2).unwrap(), BigInt::zero());
        assert_eq!(linear_tribonacci(3).unwrap(), BigInt::one());
        assert_eq!(linear_tribonacci(4).unwrap(), BigInt::one());
    }

    #[test]
    fn matrix_boundaries() {
        assert_eq!(matrix_tribonacci(1, None).unwrap(), BigInt::zero());
        assert_eq!(matrix_tribonacci(2, None).unwrap(), BigInt::zero());
        assert_eq!(matrix_tribonacci(3, None).unwrap(), BigInt::one());
        assert_eq!(matrix_tribonacci(4, None).unwrap(), BigInt::one());
    }

    #[test]
    fn invalid_index_is_reported() {
        for n in [0, -1, -5, i64::MIN] {
            assert!(matches!(
                linear_tribonacci(n),
                Err(TribonacciError::InvalidIndex(bad)) if bad == n
            ));
            assert!(matches!(
                matrix_tribonacci(n, None),
                Err(TribonacciError::InvalidIndex(bad)) if bad == n
            ));
        }
    }

    #[test]
    fn invalid_index_wins_over_cancellation() {
        let token = CancellationToken::new();
        token.cancel();
        assert!(matches!(
            matrix_tribonacci(0, Some(&token)),
            Err(TribonacciError::InvalidIndex(0))
        ));
    }

    #[test]
    fn first_two_terms_ignore_cancellation() {
        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(matrix_tribonacci(1, Some(&token)).unwrap(), BigInt::zero());
        assert_eq!(matrix_tribonacci(2, Some(&token)).unwrap(), BigInt::zero());
        assert!(matches!(
            matrix_tribonacci(3, Some(&token)),
            Err(TribonacciError::Interrupted)
        ));
    }

    #[test]
    fn seq_linear_matches_linear_tribonacci() {
        assert!(seq_linear(0).is_empty());
        assert_eq!(seq_linear(2), vec![BigInt::zero(), BigInt::zero()]);

        let seq = seq_linear(300);
        assert_eq!(seq.len(), 300);
        for (i, value) in seq.iter().enumerate() {
            assert_eq!(*value, linear_tribonacci(i as i64 + 1).unwrap());
        }
    }

    #[test]
    fn rayon_variant_agrees() {
        for n in 1..=200 {
            assert_eq!(
                matrix_tribonacci_rayon(n, None).unwrap(),
                matrix_tribonacci(n, None).unwrap()
            );
        }
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            TribonacciError::InvalidIndex(-5).to_string(),
            "invalid index -5: must be >= 1"
        );
        assert_eq!(
            TribonacciError::Interrupted.to_string(),
            "calculation was interrupted"
        );
    }
}
