//! Conversion of event dates to times.

use ql_core::errors::Result;
use ql_core::{ensure_arg, Time};
use ql_time::{Date, DayCounter};

/// Year fractions from `reference` to each of `dates` under `day_counter`.
///
/// Dates before the reference date are rejected.
pub fn times_from_dates(
    reference: Date,
    dates: &[Date],
    day_counter: &dyn DayCounter,
) -> Result<Vec<Time>> {
    dates
        .iter()
        .map(|&d| {
            ensure_arg!(d >= reference, "date {d} precedes the reference date {reference}");
            Ok(day_counter.year_fraction(reference, d))
        })
        .collect()
}
