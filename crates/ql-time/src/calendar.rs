//! `Calendar` trait and the holiday-free calendars.
//!
//! A calendar knows which dates are business days. Holiday rule tables are
//! left to downstream implementors of the trait.

use ql_core::errors::Result;

use crate::business_day_convention::BusinessDayConvention;
use crate::date::Date;
use crate::time_unit::TimeUnit;

/// A financial calendar.
pub trait Calendar: std::fmt::Debug + Send + Sync {
    /// Human-readable name.
    fn name(&self) -> &str;

    /// Return `true` if `date` is a business day in this calendar.
    fn is_business_day(&self, date: Date) -> bool;

    /// Return `true` if `date` is not a business day.
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Adjust `date` according to the given business-day convention.
    fn adjust(&self, date: Date, convention: BusinessDayConvention) -> Date {
        let roll = |mut d: Date, step: i64| {
            while self.is_holiday(d) {
                d += step;
            }
            d
        };
        match convention {
            BusinessDayConvention::Unadjusted => date,
            BusinessDayConvention::Following => roll(date, 1),
            BusinessDayConvention::Preceding => roll(date, -1),
            BusinessDayConvention::ModifiedFollowing => {
                let d = roll(date, 1);
                if d.month() != date.month() {
                    roll(date, -1)
                } else {
                    d
                }
            }
            BusinessDayConvention::ModifiedPreceding => {
                let d = roll(date, -1);
                if d.month() != date.month() {
                    roll(date, 1)
                } else {
                    d
                }
            }
        }
    }

    /// Advance `date` by `n` units.
    ///
    /// With [`TimeUnit::Days`] the shift counts business days and the start
    /// date is first rolled forward. Any other unit adds the calendar period
    /// and adjusts the result with `convention`.
    fn advance(
        &self,
        date: Date,
        n: i64,
        unit: TimeUnit,
        convention: BusinessDayConvention,
    ) -> Result<Date> {
        match unit {
            TimeUnit::Days => {
                let mut d = date;
                if n == 0 {
                    return Ok(self.adjust(d, convention));
                }
                let step = n.signum();
                let mut remaining = n.abs();
                while remaining > 0 {
                    d = d.add_period(step, TimeUnit::Days)?;
                    if self.is_business_day(d) {
                        remaining -= 1;
                    }
                }
                Ok(d)
            }
            _ => Ok(self.adjust(date.add_period(n, unit)?, convention)),
        }
    }

    /// Number of business days in `(d1, d2]`, negative if `d2 < d1`.
    fn business_days_between(&self, d1: Date, d2: Date) -> i64 {
        let (start, end, sign) = if d2 >= d1 { (d1, d2, 1) } else { (d2, d1, -1) };
        let mut count = 0;
        let mut d = start;
        while d < end {
            d += 1;
            if self.is_business_day(d) {
                count += 1;
            }
        }
        sign * count
    }
}

/// Treats every day as a business day.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCalendar;

impl Calendar for NullCalendar {
    fn name(&self) -> &str {
        "Null"
    }

    fn is_business_day(&self, _date: Date) -> bool {
        true
    }
}

/// Only Saturdays and Sundays are holidays.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendsOnly;

impl Calendar for WeekendsOnly {
    fn name(&self) -> &str {
        "Weekends Only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend()
    }
}
