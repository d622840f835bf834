//! # ql-pricers
//!
//! Option pricers built on the finite-difference and Monte Carlo methods
//! of `ql-methods`.
//!
//! # Modules
//!
//! * [`fd`]: European, American, shout, Bermudan and discrete-dividend
//!   options on a log-price grid
//! * [`mc`]: path pricers and ready-made Monte Carlo pricers for
//!   European, Asian, barrier and multi-asset options
//! * [`config`]: grid and sampling settings
//!
//! Every pricer returns an immutable result value from `calculate()` or
//! its Monte Carlo equivalent; nothing is cached behind the caller's back.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Pricer settings.
pub mod config;

/// Conversion of event dates to times.
pub mod dates;

/// Finite-difference pricers.
pub mod fd;

/// Monte Carlo pricers.
pub mod mc;

/// Inputs of single-asset options.
pub mod parameters;

/// Option payoffs.
pub mod payoff;

/// Pricing results.
pub mod results;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use config::{FdConfig, McConfig};
pub use dates::times_from_dates;
pub use fd::{
    DividendExercise, FdAmericanOption, FdBermudanOption, FdDividendOption, FdEuropeanOption,
    FdShoutOption,
};
pub use mc::{McBarrier, McBasket, McDiscreteArithmeticApo, McEuropean, McPricer};
pub use parameters::BsmParameters;
pub use payoff::{OptionType, PlainVanillaPayoff};
pub use results::{McResults, OptionResults};
