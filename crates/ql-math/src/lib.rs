//! # ql-math
//!
//! Numerical building blocks: the `Array` and `Matrix` newtypes over
//! nalgebra, matrix factorisations, 1D interpolation, the normal
//! distribution, the weighted `Statistics` accumulator and the random
//! number generators driving the Monte Carlo engine.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// One-dimensional array of reals.
pub mod array;

/// Probability distributions.
pub mod distributions;

/// 1D interpolation schemes.
pub mod interpolations;

/// Two-dimensional matrix of reals.
pub mod matrix;

/// Matrix factorisations and covariance helpers.
pub mod matrix_utilities;

/// Random number generators.
pub mod random_numbers;

/// Statistics accumulators.
pub mod statistics;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use array::Array;
pub use distributions::{normal_cdf, normal_cdf_inverse, normal_pdf};
pub use interpolations::{Interpolation1D, LinearInterpolation, NaturalCubicSpline};
pub use matrix::Matrix;
pub use random_numbers::{
    GaussianRandomGenerator, RandomNumberGenerator, Sample, SeedableGenerator,
    UniformRandomGenerator,
};
pub use statistics::Statistics;
