//! Task persistence with file locking.
//!
//! All tasks live in a single JSON document. Reads take a shared lock;
//! writes go to a temp file in the same directory and are renamed over
//! the original so a crash never leaves a half-written store behind.

use crate::{Error, Result, Task};
use chrono::NaiveDate;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Format accepted by list search for an exact date match
const SEARCH_DATE_FORMAT: &str = "%d.%m.%Y";

/// The full set of tasks plus the id counter
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskStore {
    next_id: u64,
    tasks: Vec<Task>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self {
            next_id: 1,
            tasks: Vec::new(),
        }
    }
}

impl TaskStore {
    /// Load the store from a file with shared locking
    ///
    /// Returns an empty store if the file doesn't exist. Unlike derived
    /// state, tasks are user data: a corrupt file is an error, never
    /// silently replaced.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No task store at {:?}, starting empty", path);
            return Ok(Self::default());
        }

        let file = File::open(path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        let mut store: TaskStore = serde_json::from_str(&contents)
            .map_err(|e| Error::Store(format!("Failed to parse {:?}: {}", path, e)))?;

        // Never hand out an id that is already taken
        if let Some(max_id) = store.tasks.iter().map(|t| t.id).max() {
            if store.next_id <= max_id {
                tracing::warn!(
                    "Task store {:?} has next_id {} <= max id {}, repairing",
                    path,
                    store.next_id,
                    max_id
                );
                store.next_id = max_id.checked_add(1).ok_or_else(|| {
                    Error::Store(format!("Task store {:?} has no ids left", path))
                })?;
            }
        }

        tracing::debug!("Loaded {} tasks from {:?}", store.tasks.len(), path);
        Ok(store)
    }

    /// Save the store to a file with exclusive locking
    ///
    /// Atomically writes by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::Store(format!("Store path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} tasks to {:?}", self.tasks.len(), path);
        Ok(())
    }

    /// Load the store, modify it, and save it back
    ///
    /// An exclusive lock on a sidecar `.lock` file is held for the whole
    /// cycle, so concurrent writers are serialized instead of overwriting
    /// each other. Nothing is written if `f` fails.
    pub fn update<F, T>(path: &Path, f: F) -> Result<T>
    where
        F: FnOnce(&mut TaskStore) -> Result<T>,
    {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let lock = OpenOptions::new()
            .create(true)
            .write(true)
            .open(lock_path(path))?;
        lock.lock_exclusive()?;

        let mut store = Self::load(path)?;
        let out = f(&mut store)?;
        store.save(path)?;

        lock.unlock()?;
        Ok(out)
    }

    /// All tasks in insertion order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Add a task, assigning it the next free id
    pub fn insert(&mut self, mut task: Task) -> Result<u64> {
        let id = self.next_id;
        self.next_id = id
            .checked_add(1)
            .ok_or_else(|| Error::Store("Task ids exhausted".into()))?;
        task.id = id;
        self.tasks.push(task);
        Ok(id)
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: u64) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))
    }

    /// Replace a stored task, matched by id
    pub fn replace(&mut self, task: Task) -> Result<()> {
        let slot = self.get_mut(task.id)?;
        *slot = task;
        Ok(())
    }

    /// Move a task to a new `YYYYMMDD` date
    pub fn set_date(&mut self, id: u64, date: String) -> Result<()> {
        self.get_mut(id)?.date = date;
        Ok(())
    }

    /// Remove a task, returning it
    pub fn remove(&mut self, id: u64) -> Result<Task> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))?;
        Ok(self.tasks.remove(idx))
    }

    /// List tasks ordered by date, optionally filtered
    ///
    /// A search of the form `DD.MM.YYYY` matches tasks on that date. Any
    /// other search matches title or comment, ignoring ASCII case.
    pub fn list(&self, search: Option<&str>, limit: usize) -> Vec<&Task> {
        let filter = search.filter(|s| !s.is_empty()).map(SearchFilter::parse);

        let mut found: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| filter.as_ref().map_or(true, |f| f.matches(t)))
            .collect();

        found.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        found.truncate(limit);
        found
    }
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

/// Exactly `DD.MM.YYYY`: chrono alone would also take `1.3.2024`
fn is_search_date_shape(search: &str) -> bool {
    let bytes = search.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'.',
            _ => b.is_ascii_digit(),
        })
}

enum SearchFilter {
    Date(String),
    Text(String),
}

impl SearchFilter {
    fn parse(search: &str) -> Self {
        if !is_search_date_shape(search) {
            return SearchFilter::Text(search.to_ascii_lowercase());
        }
        match NaiveDate::parse_from_str(search, SEARCH_DATE_FORMAT) {
            Ok(date) => SearchFilter::Date(crate::date::format_date(date)),
            Err(_) => SearchFilter::Text(search.to_ascii_lowercase()),
        }
    }

    fn matches(&self, task: &Task) -> bool {
        match self {
            SearchFilter::Date(date) => &task.date == date,
            SearchFilter::Text(needle) => {
                task.title.to_ascii_lowercase().contains(needle)
                    || task.comment.to_ascii_lowercase().contains(needle)
            }
        }
    }
}
