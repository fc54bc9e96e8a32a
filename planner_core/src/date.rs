//! Calendar helpers for whole-day dates.
//!
//! Dates cross every boundary of this crate as fixed-width `YYYYMMDD`
//! strings. Internally they are `chrono::NaiveDate` values with no
//! time-of-day component.

use crate::error::RecurrenceError;
use chrono::{Datelike, Days, Local, NaiveDate};

/// A pure (year, month, day) value
pub type CalendarDate = NaiveDate;

/// Storage and wire format for dates
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Largest year that still fits the four-digit year of `YYYYMMDD`
pub const MAX_YEAR: i32 = 9999;

/// Parse a `YYYYMMDD` string.
///
/// Exactly eight ASCII digits are accepted; anything else, or an
/// impossible calendar date such as `20230229`, is `BadDate`.
pub fn parse_date(s: &str) -> Result<CalendarDate, RecurrenceError> {
    let bad = || RecurrenceError::BadDate(s.to_string());

    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad());
    }

    let year: i32 = s[0..4].parse().map_err(|_| bad())?;
    let month: u32 = s[4..6].parse().map_err(|_| bad())?;
    let day: u32 = s[6..8].parse().map_err(|_| bad())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(bad)
}

/// Format a date as `YYYYMMDD`
pub fn format_date(date: CalendarDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// The local wall-clock date
pub fn today() -> CalendarDate {
    Local::now().date_naive()
}

/// Gregorian leap year test
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Add whole calendar years, keeping month and day.
///
/// A day that does not exist in the target month overflows into the
/// following month: Feb 29 plus one year lands on Mar 1. Recurring
/// leap-day tasks depend on this, so it must stay as is.
pub fn add_years(date: CalendarDate, years: i32) -> Option<CalendarDate> {
    let year = date.year().checked_add(years)?;
    let first = NaiveDate::from_ymd_opt(year, date.month(), 1)?;
    first.checked_add_days(Days::new(u64::from(date.day() - 1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> CalendarDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("20240229").unwrap(), ymd(2024, 2, 29));
        assert_eq!(parse_date("00010101").unwrap(), ymd(1, 1, 1));
    }

    #[test]
    fn test_parse_date_rejects_malformed() {
        for input in ["", "2024031", "202403011", "2024-03-01", "2024o301", "+2024031", "20230229", "20241301", "20240100"] {
            assert_eq!(
                parse_date(input),
                Err(RecurrenceError::BadDate(input.to_string())),
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn test_format_date_pads() {
        assert_eq!(format_date(ymd(2024, 3, 2)), "20240302");
        assert_eq!(format_date(ymd(999, 1, 9)), "09990109");
    }

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2100, 2), 28);
        assert_eq!(days_in_month(2023, 4), 30);
        assert_eq!(days_in_month(2023, 12), 31);
    }

    #[test]
    fn test_add_years_keeps_day() {
        assert_eq!(add_years(ymd(2023, 7, 31), 1), Some(ymd(2024, 7, 31)));
        assert_eq!(add_years(ymd(2024, 2, 29), 4), Some(ymd(2028, 2, 29)));
    }

    #[test]
    fn test_add_years_leap_day_overflows_to_march() {
        assert_eq!(add_years(ymd(2024, 2, 29), 1), Some(ymd(2025, 3, 1)));
    }
}
