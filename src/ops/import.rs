use serde::Deserialize;

use crate::model::task::{Task, TaskError, TaskRecord};
use crate::ops::task_ops::validate_task;

/// Error type for import operations
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("could not read CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// One CSV row. Column names follow the bulk-import sheet layout:
/// `title`, `task` (the body), `tag_list` (comma-separated) and `lane`,
/// with an optional `due_date`.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    task: Option<String>,
    #[serde(default)]
    tag_list: Option<String>,
    #[serde(default)]
    lane: Option<String>,
    #[serde(default)]
    due_date: Option<String>,
}

impl From<CsvRow> for TaskRecord {
    fn from(row: CsvRow) -> Self {
        TaskRecord {
            title: row.title,
            content: row.task,
            lane: row.lane,
            tags: row
                .tag_list
                .map(|list| list.split(',').map(|t| t.trim().to_string()).collect()),
            due_date: row.due_date,
        }
    }
}

/// Result of an import: the tasks built, plus rows that were skipped
#[derive(Debug, Default)]
pub struct ImportResult {
    /// 1-based data row number and the task built from it
    pub tasks: Vec<(usize, Task)>,
    /// 1-based data row number and the reason it was skipped
    pub skipped: Vec<(usize, TaskError)>,
}

/// Read CSV records from `reader` and build a task for each row.
///
/// Rows missing a required field, or with a title or tag that cannot be
/// stored, are reported in `skipped` rather than failing the whole import;
/// malformed CSV is an error.
pub fn import_csv<R: std::io::Read>(reader: R) -> Result<ImportResult, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
    let mut result = ImportResult::default();

    for (idx, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
        let record = TaskRecord::from(row?);
        let task = Task::from_record(record).and_then(|task| validate_task(&task).map(|_| task));
        match task {
            Ok(task) => result.tasks.push((idx + 1, task)),
            Err(e) => {
                tracing::warn!(row = idx + 1, error = %e, "skipping CSV row");
                result.skipped.push((idx + 1, e));
            }
        }
    }

    Ok(result)
}
