//! Task scheduling on top of the recurrence engine.
//!
//! This is where the rules meet stored tasks:
//! - Resolving the date of a task being created or edited
//! - Marking a task done: recurring tasks move to their next date,
//!   one-shot tasks are removed

use crate::date::{self, CalendarDate};
use crate::recurrence::{next_date, next_occurrence};
use crate::{Error, RecurrenceRule, Result, TaskRequest, TaskStore};

/// Outcome of marking a task done
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    /// One-shot task, removed from the store
    Deleted,
    /// Recurring task, moved to the contained `YYYYMMDD` date
    Rescheduled(String),
}

/// Decide the date a task should be stored with.
///
/// - An empty date, `today`, or today's own date resolve to `today`.
/// - A past date resolves to `today` for one-shot tasks and to the rule's
///   next occurrence for recurring ones.
/// - A future date is kept as is.
///
/// A non-empty rule must parse and must produce an occurrence from the
/// resolved date, otherwise the request is rejected.
pub fn resolve_task_date(request: &TaskRequest, today: CalendarDate) -> Result<CalendarDate> {
    if request.title.is_empty() {
        return Err(Error::MissingTitle);
    }

    let rule = if request.repeat.is_empty() {
        None
    } else {
        Some(request.repeat.parse::<RecurrenceRule>()?)
    };

    let today_str = date::format_date(today);
    let resolved = if request.date.is_empty() || request.date == "today" || request.date == today_str
    {
        today
    } else {
        let requested = date::parse_date(&request.date)?;
        if requested >= today {
            requested
        } else {
            match &rule {
                Some(rule) => next_occurrence(today, requested, rule)?,
                None => today,
            }
        }
    };

    if let Some(rule) = &rule {
        next_occurrence(today, resolved, rule)?;
    }

    Ok(resolved)
}

/// Validate a request and add it to the store, returning the new id
pub fn add_task(store: &mut TaskStore, request: TaskRequest, today: CalendarDate) -> Result<u64> {
    let resolved = resolve_task_date(&request, today)?;
    let id = store.insert(request.into_task(0, date::format_date(resolved)))?;
    tracing::info!("Added task {} for {}", id, date::format_date(resolved));
    Ok(id)
}

/// Validate a request and overwrite task `id` with it
pub fn update_task(
    store: &mut TaskStore,
    id: u64,
    request: TaskRequest,
    today: CalendarDate,
) -> Result<()> {
    if store.get(id).is_none() {
        return Err(Error::TaskNotFound(id));
    }
    let resolved = resolve_task_date(&request, today)?;
    store.replace(request.into_task(id, date::format_date(resolved)))?;
    tracing::info!("Updated task {}", id);
    Ok(())
}

/// Mark task `id` done
pub fn complete_task(store: &mut TaskStore, id: u64, today: CalendarDate) -> Result<Completion> {
    let task = store.get(id).ok_or(Error::TaskNotFound(id))?;

    if !task.is_recurring() {
        store.remove(id)?;
        tracing::info!("Task {} done, removed", id);
        return Ok(Completion::Deleted);
    }

    let next = next_date(today, &task.date, &task.repeat)?;
    store.set_date(id, next.clone())?;
    tracing::info!("Task {} done, next on {}", id, next);
    Ok(Completion::Rescheduled(next))
}
