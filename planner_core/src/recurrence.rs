//! Next-occurrence evaluation for repeat rules.
//!
//! Given an anchor date (`now`), a task's current date (`base`) and its
//! rule, find the next date the task falls on. The result is always
//! strictly after `now` and strictly after `base`.
//!
//! Interval and yearly rules stride from `base`. Weekly and monthly rules
//! walk forward one day at a time and take the first day the rule accepts;
//! that walk is capped at [`MAX_SCAN_DAYS`].

use crate::date::{self, CalendarDate};
use crate::error::RecurrenceError;
use crate::rule::RecurrenceRule;
use chrono::{Datelike, Days};

/// Upper bound on the day-by-day scan.
///
/// Eight 366-day years: the longest legitimate gap is a Feb 29 day rule
/// straddling a skipped century leap year (2096 -> 2104).
pub const MAX_SCAN_DAYS: u32 = 8 * 366;

/// Compute the next date for a task, with dates as `YYYYMMDD` strings.
///
/// `base` is the task's stored date and `raw` its repeat rule. The rule is
/// parsed fresh on every call.
pub fn next_date(now: CalendarDate, base: &str, raw: &str) -> Result<String, RecurrenceError> {
    let base = date::parse_date(base)?;
    let rule = raw.parse::<RecurrenceRule>()?;
    next_occurrence(now, base, &rule).map(date::format_date)
}

/// Typed form of [`next_date`]
pub fn next_occurrence(
    now: CalendarDate,
    base: CalendarDate,
    rule: &RecurrenceRule,
) -> Result<CalendarDate, RecurrenceError> {
    let next = match rule {
        RecurrenceRule::Interval { days } => {
            let stride = Days::new(u64::from(*days));
            stride_past(base, now, |d| d.checked_add_days(stride))?
        }
        RecurrenceRule::Yearly => stride_past(base, now, |d| date::add_years(d, 1))?,
        RecurrenceRule::Weekly { weekdays } => scan_days(base, now, |d| {
            weekdays.contains(&d.weekday().num_days_from_monday())
        })?,
        RecurrenceRule::Monthly { month_days, months } => scan_days(base, now, |d| {
            matches_month_day(month_days, d) && (months.is_empty() || months.contains(&d.month()))
        })?,
    };

    if next.year() > date::MAX_YEAR {
        return Err(RecurrenceError::DateOutOfRange);
    }
    Ok(next)
}

/// Apply `step` to `base` at least once, until the result passes `now`
fn stride_past(
    base: CalendarDate,
    now: CalendarDate,
    step: impl Fn(CalendarDate) -> Option<CalendarDate>,
) -> Result<CalendarDate, RecurrenceError> {
    let mut next = step(base).ok_or(RecurrenceError::DateOutOfRange)?;
    while next <= now {
        next = step(next).ok_or(RecurrenceError::DateOutOfRange)?;
    }
    Ok(next)
}

/// First day after both `base` and `now` that `accept` matches.
///
/// Days up to `now` can never be chosen, so the scan starts past
/// whichever of the two is later.
fn scan_days(
    base: CalendarDate,
    now: CalendarDate,
    accept: impl Fn(CalendarDate) -> bool,
) -> Result<CalendarDate, RecurrenceError> {
    let mut day = base
        .max(now)
        .succ_opt()
        .ok_or(RecurrenceError::DateOutOfRange)?;

    for _ in 0..MAX_SCAN_DAYS {
        if accept(day) {
            return Ok(day);
        }
        day = day.succ_opt().ok_or(RecurrenceError::DateOutOfRange)?;
    }
    Err(RecurrenceError::NoOccurrence)
}

fn matches_month_day(month_days: &[i32], day: CalendarDate) -> bool {
    let last = date::days_in_month(day.year(), day.month());
    let dom = day.day();

    month_days.iter().any(|&spec| match spec {
        -1 => dom == last,
        -2 => dom + 1 == last,
        n => u32::try_from(n).map_or(false, |n| n == dom),
    })
}
