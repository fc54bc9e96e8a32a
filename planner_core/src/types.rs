//! Core domain types for the planner.
//!
//! - Stored tasks
//! - Incoming create/update requests

use serde::{Deserialize, Serialize};

/// A scheduled task as persisted in the task store
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: u64,
    /// Due date as `YYYYMMDD`
    pub date: String,
    pub title: String,
    #[serde(default)]
    pub comment: String,
    /// Raw repeat rule; empty for one-shot tasks
    #[serde(default)]
    pub repeat: String,
}

impl Task {
    /// One-shot tasks are removed when marked done
    pub fn is_recurring(&self) -> bool {
        !self.repeat.is_empty()
    }
}

/// A task as submitted for creation or update.
///
/// `date` may be empty or the literal `today`; both mean the current day.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TaskRequest {
    #[serde(default)]
    pub date: String,
    pub title: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub repeat: String,
}

impl TaskRequest {
    /// Build the stored task once its date has been resolved
    pub fn into_task(self, id: u64, date: String) -> Task {
        Task {
            id,
            date,
            title: self.title,
            comment: self.comment,
            repeat: self.repeat,
        }
    }
}
