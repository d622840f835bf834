//! # ql-time
//!
//! Dates, day counters and calendars: the seam through which the pricers
//! turn calendar dates into the year-fraction times the numerical engines
//! work with.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Business-day adjustment conventions.
pub mod business_day_convention;

/// Calendar trait and the holiday-free calendars.
pub mod calendar;

/// `Date` type.
pub mod date;

/// `DayCounter` trait and built-in day-count conventions.
pub mod day_counter;

/// `TimeUnit`: days, weeks, months, years.
pub mod time_unit;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use business_day_convention::BusinessDayConvention;
pub use calendar::{Calendar, NullCalendar, WeekendsOnly};
pub use date::Date;
pub use day_counter::{Actual360, Actual365Fixed, DayCounter};
pub use time_unit::TimeUnit;
