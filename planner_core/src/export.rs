//! CSV export of the task list.

use crate::{Result, Task};
use std::fs::File;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    id: u64,
    date: &'a str,
    title: &'a str,
    comment: &'a str,
    repeat: &'a str,
}

impl<'a> From<&'a Task> for CsvRow<'a> {
    fn from(task: &'a Task) -> Self {
        CsvRow {
            id: task.id,
            date: &task.date,
            title: &task.title,
            comment: &task.comment,
            repeat: &task.repeat,
        }
    }
}

/// Write `tasks` to `path` as CSV, replacing any existing file
///
/// The header row is always written, even for an empty list. Returns the
/// number of tasks written.
pub fn export_csv<'a, I>(tasks: I, path: &Path) -> Result<usize>
where
    I: IntoIterator<Item = &'a Task>,
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(File::create(path)?);
    writer.write_record(["id", "date", "title", "comment", "repeat"])?;

    let mut count = 0;
    for task in tasks {
        writer.serialize(CsvRow::from(task))?;
        count += 1;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Exported {} tasks to {:?}", count, path);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_writes_header_and_rows() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("out").join("tasks.csv");

        let tasks = vec![
            Task {
                id: 1,
                date: "20240301".into(),
                title: "Pay rent".into(),
                comment: "bank, online".into(),
                repeat: "m 1".into(),
            },
            Task {
                id: 2,
                date: "20240302".into(),
                title: "Call mom".into(),
                comment: String::new(),
                repeat: String::new(),
            },
        ];

        let count = export_csv(&tasks, &path).unwrap();
        assert_eq!(count, 2);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "id,date,title,comment,repeat");
        assert_eq!(lines[1], "1,20240301,Pay rent,\"bank, online\",m 1");
        assert_eq!(lines[2], "2,20240302,Call mom,,");
    }

    #[test]
    fn test_export_empty_list() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("tasks.csv");

        assert_eq!(export_csv(&Vec::<Task>::new(), &path).unwrap(), 0);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap().trim(),
            "id,date,title,comment,repeat"
        );
    }
}
