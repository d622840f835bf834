//! `Date` type.
//!
//! Dates are stored as a [`chrono::NaiveDate`]. The serial number exposed by
//! [`Date::serial`] counts days from 30 December 1899, matching spreadsheet
//! serials for every date after February 1900.

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use chrono::{Datelike, Days, Months, NaiveDate};
use ql_core::errors::{Error, Result};

use crate::time_unit::TimeUnit;

/// A calendar date.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(NaiveDate);

fn epoch() -> NaiveDate {
    // 1899-12-30 is always representable.
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN)
}

impl Date {
    /// Create a date from year, month (1–12), and day of month.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| Error::Date(format!("invalid date {year}-{month:02}-{day:02}")))
    }

    /// Create a date from its serial number.
    pub fn from_serial(serial: i64) -> Result<Self> {
        let base = epoch();
        let shifted = if serial >= 0 {
            base.checked_add_days(Days::new(serial as u64))
        } else {
            base.checked_sub_days(Days::new(serial.unsigned_abs()))
        };
        shifted
            .map(Date)
            .ok_or_else(|| Error::Date(format!("serial {serial} out of range")))
    }

    /// Wrap an existing chrono date.
    pub fn from_naive(date: NaiveDate) -> Self {
        Date(date)
    }

    /// The underlying chrono date.
    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    /// Days elapsed since 30 December 1899.
    pub fn serial(&self) -> i64 {
        (self.0 - epoch()).num_days()
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month (1–12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Day of the month (1–31).
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Day of the week.
    pub fn weekday(&self) -> chrono::Weekday {
        self.0.weekday()
    }

    /// `true` on Saturdays and Sundays.
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday(), chrono::Weekday::Sat | chrono::Weekday::Sun)
    }

    /// Add `n` units of time.
    ///
    /// Month and year steps clamp to the last day of the target month, so
    /// 31 January plus one month is the last day of February.
    pub fn add_period(&self, n: i64, unit: TimeUnit) -> Result<Self> {
        let out_of_range = || Error::Date(format!("{self} + {n} {unit} is out of range"));
        let shifted = match unit {
            TimeUnit::Days => self.checked_add_days(n),
            TimeUnit::Weeks => self.checked_add_days(n.checked_mul(7).ok_or_else(out_of_range)?),
            TimeUnit::Months => self.checked_add_months(n),
            TimeUnit::Years => self.checked_add_months(n.checked_mul(12).ok_or_else(out_of_range)?),
        };
        shifted.map(Date).ok_or_else(out_of_range)
    }

    fn checked_add_days(&self, n: i64) -> Option<NaiveDate> {
        if n >= 0 {
            self.0.checked_add_days(Days::new(n as u64))
        } else {
            self.0.checked_sub_days(Days::new(n.unsigned_abs()))
        }
    }

    fn checked_add_months(&self, n: i64) -> Option<NaiveDate> {
        let months = u32::try_from(n.unsigned_abs()).ok()?;
        if n >= 0 {
            self.0.checked_add_months(Months::new(months))
        } else {
            self.0.checked_sub_months(Months::new(months))
        }
    }
}

// ── Arithmetic ────────────────────────────────────────────────────────────────

// Day-offset operators panic outside chrono's range, like integer overflow.

impl Add<i64> for Date {
    type Output = Date;
    fn add(self, days: i64) -> Date {
        match self.checked_add_days(days) {
            Some(d) => Date(d),
            None => panic!("date overflow: {self} + {days} days"),
        }
    }
}

impl Sub<i64> for Date {
    type Output = Date;
    fn sub(self, days: i64) -> Date {
        self + (-days)
    }
}

impl AddAssign<i64> for Date {
    fn add_assign(&mut self, days: i64) {
        *self = *self + days;
    }
}

impl SubAssign<i64> for Date {
    fn sub_assign(&mut self, days: i64) {
        *self = *self - days;
    }
}

/// Number of days from `rhs` to `self`.
impl Sub<Date> for Date {
    type Output = i64;
    fn sub(self, rhs: Date) -> i64 {
        (self.0 - rhs.0).num_days()
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl fmt::Debug for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Date({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_matches_spreadsheet_convention() {
        let d = Date::from_ymd(1900, 3, 1).unwrap();
        assert_eq!(d.serial(), 61);
        let d = Date::from_ymd(2024, 1, 1).unwrap();
        assert_eq!(d.serial(), 45292);
        assert_eq!(Date::from_serial(45292).unwrap(), d);
    }

    #[test]
    fn invalid_date_is_an_error() {
        assert!(matches!(Date::from_ymd(2023, 2, 29), Err(Error::Date(_))));
        assert!(Date::from_ymd(2024, 2, 29).is_ok());
    }

    #[test]
    fn month_arithmetic_clamps_to_month_end() {
        let d = Date::from_ymd(2024, 1, 31).unwrap();
        assert_eq!(d.add_period(1, TimeUnit::Months).unwrap(), Date::from_ymd(2024, 2, 29).unwrap());
        assert_eq!(d.add_period(-2, TimeUnit::Months).unwrap(), Date::from_ymd(2023, 11, 30).unwrap());
        assert_eq!(d.add_period(1, TimeUnit::Years).unwrap(), Date::from_ymd(2025, 1, 31).unwrap());
    }

    #[test]
    fn day_arithmetic() {
        let d = Date::from_ymd(2024, 12, 30).unwrap();
        let e = d + 5;
        assert_eq!(e, Date::from_ymd(2025, 1, 4).unwrap());
        assert_eq!(e - d, 5);
        assert_eq!(e - 5, d);
        assert_eq!(d.add_period(2, TimeUnit::Weeks).unwrap() - d, 14);
    }
}
