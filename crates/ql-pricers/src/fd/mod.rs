//! Finite-difference pricers for Black-Scholes options.

mod bermudan;
mod dividend;
mod multi_period;
mod numerical_option;
mod vanilla;

pub use bermudan::{BermudanExercise, FdBermudanOption};
pub use dividend::{DividendExercise, DividendSchedule, FdDividendOption};
pub use multi_period::{FdMultiPeriodOption, FdState, IntermediateStep, EVENT_TIME_TOLERANCE};
pub use numerical_option::{BsmNumericalOption, FdGrid};
pub use vanilla::{FdAmericanOption, FdEuropeanOption, FdShoutOption};
