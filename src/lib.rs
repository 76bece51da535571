//! # Tribonacci Library
//!
//! This library computes terms of the tribonacci sequence (0, 0, 1, 1, 2, 4, 7, 13, ...), where
//! every term is the sum of the three before it, using arbitrary-precision integers so that no
//! index overflows. Two algorithms are provided and always agree exactly.
//!
//! ## Key Features
//! - **Linear Sweep**: O(n) additions over a sliding window of the three most recent terms.
//! - **Matrix Exponentiation**: O(log n) multiplications of a fixed 3x3 transformation matrix,
//!   raised to the power `n - 3` by recursive squaring.
//! - **Cooperative Cancellation**: The matrix variant polls a caller-owned signal between
//!   recursion levels and stops with an `Interrupted` error instead of a value.
//! - **Concurrency**: A rayon variant computes the nine cells of each product in parallel, and a
//!   Tokio entry point moves the computation onto the blocking pool.
//!
//! ## Overview of Functions
//!
//! ### Errors
//! - `TribonacciError`: `InvalidIndex` for `n <= 0`, `Interrupted` when cancellation was
//!   observed, and `TokioJoin` when the blocking task fails.
//!
//! ### Tribonacci Computation Approaches
//!
//! #### `linear_tribonacci`
//! Iterative dynamic-programming computation of T(n). Returns the seeds directly for n <= 3.
//!
//! #### `seq_linear`
//! Generates T(1) through T(limit) in a single pass.
//!
//! #### `matrix_tribonacci`
//! Raises the transformation matrix to `n - 3` with [`math::power`] and reads the top-left
//! cell. Accepts an optional [`cancel::CancelSignal`].
//!
//! #### `matrix_tribonacci_rayon`
//! Same as `matrix_tribonacci`, with [`math::multiply_par`] as the multiplication kernel.
//!
//! #### `matrix_tribonacci_tokio`
//! Async wrapper that runs `matrix_tribonacci` through `tokio::task::spawn_blocking`.
//!
//! ### Cancellation Signals
//! Anything implementing [`cancel::CancelSignal`]: a [`cancel::CancellationToken`], a plain
//! `AtomicBool`, or a `kanal::Receiver<()>` used as a quit channel.
//!
//! ## Usage Example
//! ```rust
//! use tribonacci::cancel::CancellationToken;
//! use tribonacci::tribonacci::{linear_tribonacci, matrix_tribonacci, TribonacciError};
//! use num_bigint::BigInt;
//!
//! let expected = BigInt::parse_bytes(b"28992087708416717612934417", 10).unwrap();
//! assert_eq!(linear_tribonacci(100).unwrap(), expected);
//! assert_eq!(matrix_tribonacci(100, None).unwrap(), expected);
//!
//! let token = CancellationToken::new();
//! token.cancel();
//! assert!(matches!(
//!     matrix_tribonacci(1000, Some(&token)),
//!     Err(TribonacciError::Interrupted)
//! ));
//! ```

pub mod cancel;
pub mod math;
pub mod tribonacci;

pub use tribonacci::{
    linear_tribonacci, matrix_tribonacci, matrix_tribonacci_rayon, matrix_tribonacci_tokio,
    seq_linear, TribonacciError,
};
