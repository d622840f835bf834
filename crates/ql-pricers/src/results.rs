//! Immutable pricing results.

use ql_core::{Real, Size};

/// Value and grid Greeks of a finite-difference pricer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionResults {
    /// Present value.
    pub value: Real,
    /// `∂V/∂S` at the underlying.
    pub delta: Real,
    /// `∂²V/∂S²` at the underlying.
    pub gamma: Real,
    /// `∂V/∂t` per year of calendar time.
    pub theta: Real,
}

/// Estimate produced by a Monte Carlo pricer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct McResults {
    /// Sample mean of the discounted payoff.
    pub value: Real,
    /// Standard error of the mean.
    pub error_estimate: Real,
    /// Number of samples drawn.
    pub samples: Size,
}
