//! # ql-methods
//!
//! Numerical methods: finite-difference PDE solvers and the Monte Carlo
//! simulation framework.
//!
//! # Modules
//!
//! * [`finite_differences`]: tridiagonal operators, evolvers, step
//!   conditions and backward rollback
//! * [`monte_carlo`]: time grids, path generation, path pricing and
//!   sample accumulation

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Finite difference methods for one-dimensional PDEs.
pub mod finite_differences;

/// Monte Carlo simulation: paths, pricers, statistics.
pub mod monte_carlo;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use finite_differences::{
    BoundaryCondition, BsmOperator, Evolver, FdScheme, FiniteDifferenceModel, StepCondition,
    TridiagonalOperator,
};
pub use monte_carlo::{
    MonteCarloModel, MultiPath, MultiPathGenerator, Path, PathGenerator, PathPricer,
    SampleGenerator, StandardPathGenerator, TimeGrid,
};
