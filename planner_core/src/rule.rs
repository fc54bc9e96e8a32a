//! Recurrence rule grammar.
//!
//! A task's repeat rule is stored as a short string and parsed on every
//! use. Four forms exist:
//!
//! - `d <n>`: every `n` days, 1..=400
//! - `y`: every year
//! - `w <d1,d2,...>`: on the listed weekdays, 1 = Monday .. 7 = Sunday
//! - `m <days>[ <months>]`: on the listed days of the month (-1 is the
//!   last day, -2 the day before it), optionally only in the listed months

use crate::error::RecurrenceError;
use std::str::FromStr;

/// A parsed repeat rule
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecurrenceRule {
    /// Every `days` days
    Interval { days: u32 },
    /// Every year on the same month and day
    Yearly,
    /// On the given weekdays, stored zero-based from Monday
    Weekly { weekdays: Vec<u32> },
    /// On the given days of the month; empty `months` means every month
    Monthly { month_days: Vec<i32>, months: Vec<u32> },
}

const MAX_INTERVAL_DAYS: i32 = 400;

impl FromStr for RecurrenceRule {
    type Err = RecurrenceError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_rule(raw)
    }
}

/// Parse a raw repeat string into a rule
pub fn parse_rule(raw: &str) -> Result<RecurrenceRule, RecurrenceError> {
    if raw == "y" {
        return Ok(RecurrenceRule::Yearly);
    }
    if let Some(args) = raw.strip_prefix("d ") {
        return parse_interval(args);
    }
    if let Some(args) = raw.strip_prefix("w ") {
        return parse_weekly(args);
    }
    if let Some(args) = raw.strip_prefix("m ") {
        return parse_monthly(args);
    }
    Err(RecurrenceError::UnknownRule)
}

fn parse_interval(args: &str) -> Result<RecurrenceRule, RecurrenceError> {
    if args.contains(' ') {
        return Err(RecurrenceError::BadInterval);
    }
    let days = parse_int(args, |n| (1..=MAX_INTERVAL_DAYS).contains(&n))
        .ok_or(RecurrenceError::BadInterval)?;

    Ok(RecurrenceRule::Interval {
        days: days.unsigned_abs(),
    })
}

fn parse_weekly(args: &str) -> Result<RecurrenceRule, RecurrenceError> {
    if args.contains(' ') {
        return Err(RecurrenceError::BadWeekday);
    }
    // Weekday items may carry surrounding whitespace such as tabs
    let weekdays = args
        .split(',')
        .map(|item| parse_int(item.trim(), |n| (1..=7).contains(&n)))
        .collect::<Option<Vec<i32>>>()
        .ok_or(RecurrenceError::BadWeekday)?
        .into_iter()
        .map(|day| day.unsigned_abs() - 1)
        .collect();

    Ok(RecurrenceRule::Weekly { weekdays })
}

fn parse_monthly(args: &str) -> Result<RecurrenceRule, RecurrenceError> {
    let mut tokens = args.split(' ');

    let days_token = tokens.next().ok_or(RecurrenceError::BadMonthSpec)?;
    let month_days = parse_list(days_token, |n| (-2..=31).contains(&n) && n != 0)
        .ok_or(RecurrenceError::BadMonthSpec)?;

    let months = match tokens.next() {
        Some(token) => parse_list(token, |n| (1..=12).contains(&n))
            .ok_or(RecurrenceError::BadMonthSpec)?
            .into_iter()
            .map(i32::unsigned_abs)
            .collect(),
        None => Vec::new(),
    };

    if tokens.next().is_some() {
        return Err(RecurrenceError::BadMonthSpec);
    }

    Ok(RecurrenceRule::Monthly { month_days, months })
}

/// Parse a comma separated list, or `None` if any item is invalid
fn parse_list(token: &str, valid: impl Fn(i32) -> bool) -> Option<Vec<i32>> {
    token.split(',').map(|item| parse_int(item, &valid)).collect()
}

fn parse_int(item: &str, valid: impl Fn(i32) -> bool) -> Option<i32> {
    item.parse::<i32>().ok().filter(|n| valid(*n))
}
