//! `DayCounter` trait and the actual-days conventions.
//!
//! A day counter turns a pair of dates into the year fraction used as the
//! time coordinate by the pricers.

use crate::date::Date;
use ql_core::{Real, Time};

/// A convention for counting the fraction of a year between two dates.
pub trait DayCounter: std::fmt::Debug + Send + Sync {
    /// Human-readable name of this convention (e.g. `"Actual/365 (Fixed)"`).
    fn name(&self) -> &str;

    /// Number of days between `d1` and `d2`, negative if `d2 < d1`.
    fn day_count(&self, d1: Date, d2: Date) -> i64 {
        d2 - d1
    }

    /// Fraction of a year between `d1` and `d2`.
    fn year_fraction(&self, d1: Date, d2: Date) -> Time;
}

/// Actual/365 (Fixed): `actual_days / 365`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Actual365Fixed;

impl DayCounter for Actual365Fixed {
    fn name(&self) -> &str {
        "Actual/365 (Fixed)"
    }

    fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        self.day_count(d1, d2) as Real / 365.0
    }
}

/// Actual/360: `actual_days / 360`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Actual360;

impl DayCounter for Actual360 {
    fn name(&self) -> &str {
        "Actual/360"
    }

    fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        self.day_count(d1, d2) as Real / 360.0
    }
}
