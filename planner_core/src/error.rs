//! Error types for the planner_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised while parsing or evaluating a recurrence rule.
///
/// These are always per-request validation failures: the same inputs
/// produce the same error, so callers should report rather than retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecurrenceError {
    /// The rule prefix is not one of `d `, `y`, `w `, `m `, or the rule is empty
    #[error("unknown repeat rule")]
    UnknownRule,

    /// Interval rule is malformed or its day count is outside 1..=400
    #[error("bad day interval")]
    BadInterval,

    /// Weekly rule is malformed or a weekday is outside 1..=7
    #[error("bad weekday value")]
    BadWeekday,

    /// Monthly rule is missing its day list or holds an out-of-range value
    #[error("bad month rule")]
    BadMonthSpec,

    /// A date string is not a valid YYYYMMDD date
    #[error("bad date format: {0:?}")]
    BadDate(String),

    /// The day scan found no matching date within its bound
    #[error("rule never produces a date")]
    NoOccurrence,

    /// Date arithmetic overflowed the supported calendar range
    #[error("date out of range")]
    DateOutOfRange,
}

/// Core error type for planner_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Recurrence rule or date error
    #[error(transparent)]
    Recurrence(#[from] RecurrenceError),

    /// Task submitted without a title
    #[error("task title is required")]
    MissingTitle,

    /// No task with the given id
    #[error("task {0} not found")]
    TaskNotFound(u64),

    /// Task store is unreadable or inconsistent
    #[error("Store error: {0}")]
    Store(String),
}
