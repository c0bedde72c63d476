use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::parse::{extract_annotations, inject_annotations, parse_due_date};

/// File extension for task files inside a lane directory
pub const TASK_EXTENSION: &str = "md";

/// Error type for building and editing tasks
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("invalid due date '{0}': use YYYY-MM-DD")]
    InvalidDueDate(String),
    #[error("invalid tag '{0}': tags cannot contain ']' or line breaks")]
    InvalidTag(String),
    #[error("invalid title '{0}': titles must be non-empty and cannot contain path separators")]
    InvalidTitle(String),
}

/// A structured task description, as it arrives from bulk import or a JSON
/// request. Every field is optional here; `Task::from_record` decides which
/// ones are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub lane: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub due_date: Option<String>,
}

/// A task held in one markdown file under its lane directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Unique within a lane; also the file stem
    pub title: String,
    /// Body text with annotation lines removed
    pub content: String,
    /// `None` means the task never had tags, `Some(vec![])` means it was
    /// given an explicitly empty list
    pub tags: Option<Vec<String>>,
    pub due_date: Option<NaiveDate>,
    /// Name of the owning lane directory
    pub lane: String,
}

impl Task {
    /// Create a task with no tags and no due date
    pub fn new(title: impl Into<String>, content: impl Into<String>, lane: impl Into<String>) -> Self {
        Task {
            title: title.into(),
            content: content.into(),
            tags: None,
            due_date: None,
            lane: lane.into(),
        }
    }

    /// Decode a task from its stored text. The title is the file stem of
    /// `location`; the lane is taken as given.
    pub fn load(raw: &str, lane: &str, location: &Path) -> Self {
        let annotations = extract_annotations(raw);
        let title = location
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Task {
            title,
            content: annotations.body,
            tags: annotations.tags,
            due_date: annotations.due_date,
            lane: lane.to_string(),
        }
    }

    /// Encode the task for storage, re-embedding tags and due date
    pub fn save(&self) -> String {
        inject_annotations(&self.content, self.tags.as_deref(), self.due_date)
    }

    /// Build a task from a structured record. `title`, `content` and `lane`
    /// are required; a due date that does not parse is dropped with a warning.
    pub fn from_record(record: TaskRecord) -> Result<Self, TaskError> {
        let title = record.title.ok_or(TaskError::MissingField("title"))?;
        let content = record.content.ok_or(TaskError::MissingField("content"))?;
        let lane = record.lane.ok_or(TaskError::MissingField("lane"))?;

        let tags = record.tags.map(|tags| {
            tags.iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
        });

        let due_date = match record.due_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => {
                let parsed = parse_due_date(value);
                if parsed.is_none() {
                    tracing::warn!(title = %title, value, "dropping unparsable due date");
                }
                parsed
            }
        };

        Ok(Task {
            title,
            content,
            tags,
            due_date,
            lane,
        })
    }

    /// Storage location relative to the board root: `<lane>/<title>.md`
    pub fn location(&self) -> PathBuf {
        Path::new(&self.lane).join(format!("{}.{}", self.title, TASK_EXTENSION))
    }

    /// Tags as a slice, empty when absent
    pub fn tag_list(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag_list().iter().any(|t| t == tag)
    }
}
