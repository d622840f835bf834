//! Integration tests for the date, day counter and calendar seams.

use approx::assert_abs_diff_eq;
use ql_time::{
    Actual360, Actual365Fixed, BusinessDayConvention, Calendar, Date, DayCounter, NullCalendar,
    TimeUnit, WeekendsOnly,
};

fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd(y, m, d).unwrap()
}

#[test]
fn test_actual_day_counters() {
    let cases = [
        (date(2024, 1, 1), date(2025, 1, 1), 366.0 / 365.0, 366.0 / 360.0),
        (date(2023, 6, 15), date(2023, 12, 15), 183.0 / 365.0, 183.0 / 360.0),
        (date(2023, 12, 15), date(2023, 6, 15), -183.0 / 365.0, -183.0 / 360.0),
    ];
    for (d1, d2, act365, act360) in cases {
        assert_abs_diff_eq!(Actual365Fixed.year_fraction(d1, d2), act365, epsilon = 1e-14);
        assert_abs_diff_eq!(Actual360.year_fraction(d1, d2), act360, epsilon = 1e-14);
    }
}

#[test]
fn test_advance_business_days_skips_weekends() {
    let cal = WeekendsOnly;
    // Friday 2023-09-01 + 1 business day = Monday 2023-09-04
    let fri = date(2023, 9, 1);
    let next = cal
        .advance(fri, 1, TimeUnit::Days, BusinessDayConvention::Following)
        .unwrap();
    assert_eq!(next, date(2023, 9, 4));
    let back = cal
        .advance(next, -1, TimeUnit::Days, BusinessDayConvention::Following)
        .unwrap();
    assert_eq!(back, fri);
    let week = cal
        .advance(fri, 5, TimeUnit::Days, BusinessDayConvention::Following)
        .unwrap();
    assert_eq!(week, date(2023, 9, 8));
}

#[test]
fn test_advance_months_adjusts_result() {
    let cal = WeekendsOnly;
    // 2023-08-31 + 1M = 2023-09-30 (Saturday)
    let d = date(2023, 8, 31);
    let mf = cal
        .advance(d, 1, TimeUnit::Months, BusinessDayConvention::ModifiedFollowing)
        .unwrap();
    assert_eq!(mf, date(2023, 9, 29));
    let f = cal
        .advance(d, 1, TimeUnit::Months, BusinessDayConvention::Following)
        .unwrap();
    assert_eq!(f, date(2023, 10, 2));
    let null = NullCalendar
        .advance(d, 1, TimeUnit::Months, BusinessDayConvention::Following)
        .unwrap();
    assert_eq!(null, date(2023, 9, 30));
}

#[test]
fn test_serial_round_trip_over_a_decade() {
    let mut d = date(2020, 1, 1);
    let end = date(2030, 1, 1);
    while d < end {
        assert_eq!(Date::from_serial(d.serial()).unwrap(), d);
        d += 37;
    }
}
