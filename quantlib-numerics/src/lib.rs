//! # quantlib-numerics
//!
//! Finite-difference and Monte Carlo engines for option pricing.
//!
//! This crate is a **façade** that re-exports the workspace crates.
//! Application code should depend on this crate rather than the individual
//! `ql-*` crates.
//!
//! ## Quick start
//!
//! ```toml
//! [dependencies]
//! quantlib-numerics = "0.1"
//! ```
//!
//! ```rust
//! use quantlib_numerics::pricers::{BsmParameters, FdConfig, FdEuropeanOption, OptionType};
//!
//! let params = BsmParameters::new(OptionType::Call, 100.0, 100.0, 0.0, 0.05, 1.0, 0.2);
//! let option = FdEuropeanOption::new(params, 100, 101, FdConfig::default()).unwrap();
//! let results = option.calculate().unwrap();
//! assert!((results.value - 10.45).abs() < 0.05);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use ql_core as core;

/// Dates, calendars and day counters.
pub use ql_time as time;

/// Arrays, matrices, statistics, distributions and random numbers.
pub use ql_math as math;

/// Numerical methods (finite differences, Monte Carlo).
pub use ql_methods as methods;

/// Finite-difference and Monte Carlo option pricers.
pub use ql_pricers as pricers;
