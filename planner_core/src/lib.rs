#![forbid(unsafe_code)]

//! Core logic for a personal task planner with repeating tasks.
//!
//! This crate provides:
//! - The repeat-rule grammar and next-occurrence evaluation
//! - Calendar helpers for `YYYYMMDD` dates
//! - Task model, persistence and scheduling
//! - Configuration, logging and CSV export

pub mod types;
pub mod error;
pub mod date;
pub mod rule;
pub mod recurrence;
pub mod config;
pub mod logging;
pub mod store;
pub mod scheduler;
pub mod export;

// Re-export commonly used types
pub use error::{Error, RecurrenceError, Result};
pub use types::*;
pub use date::{format_date, parse_date, CalendarDate};
pub use rule::{parse_rule, RecurrenceRule};
pub use recurrence::{next_date, next_occurrence};
pub use config::Config;
pub use store::TaskStore;
pub use scheduler::{add_task, complete_task, resolve_task_date, update_task, Completion};
pub use export::export_csv;
