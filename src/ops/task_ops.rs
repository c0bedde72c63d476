use regex::Regex;

use crate::model::board::Board;
use crate::model::task::{Task, TaskError};
use crate::parse::{is_valid_tag, parse_due_date};

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Find a task by title, searching lanes in board order
pub fn find_task<'a>(board: &'a Board, title: &str) -> Option<&'a Task> {
    board.tasks().find(|t| t.title == title)
}

/// Select tasks by lane, tag and a regex over title and content.
///
/// A lane the board does not have is ignored, so every lane is searched.
pub fn filter_tasks<'a>(
    board: &'a Board,
    lane: Option<&str>,
    tag: Option<&str>,
    pattern: Option<&Regex>,
) -> Vec<&'a Task> {
    let tasks: Box<dyn Iterator<Item = &'a Task> + 'a> = match lane.and_then(|l| board.lane(l)) {
        Some(tasks) => Box::new(tasks.iter()),
        None => Box::new(board.tasks()),
    };

    tasks
        .filter(|t| tag.is_none_or(|tag| t.has_tag(tag)))
        .filter(|t| pattern.is_none_or(|re| re.is_match(&t.title) || re.is_match(&t.content)))
        .collect()
}

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

/// Parse a comma-separated tag list, trimming entries and dropping empties
pub fn parse_tag_list(s: &str) -> Result<Vec<String>, TaskError> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(validate_tag)
        .collect()
}

pub fn validate_tag(tag: &str) -> Result<String, TaskError> {
    if is_valid_tag(tag) {
        Ok(tag.trim().to_string())
    } else {
        Err(TaskError::InvalidTag(tag.to_string()))
    }
}

/// Titles become file names, so they cannot be empty or contain separators
pub fn validate_title(title: &str) -> Result<(), TaskError> {
    let t = title.trim();
    if t.is_empty() || t == "." || t == ".." || t.contains('/') || t.contains('\\') {
        return Err(TaskError::InvalidTitle(title.to_string()));
    }
    Ok(())
}

/// Check that a task's title and tags can be written to disk
pub fn validate_task(task: &Task) -> Result<(), TaskError> {
    validate_title(&task.title)?;
    for tag in task.tag_list() {
        validate_tag(tag)?;
    }
    Ok(())
}

/// Parse a due date given on the command line; an empty string clears it
pub fn parse_due_arg(s: &str) -> Result<Option<chrono::NaiveDate>, TaskError> {
    if s.trim().is_empty() {
        return Ok(None);
    }
    parse_due_date(s)
        .map(Some)
        .ok_or_else(|| TaskError::InvalidDueDate(s.to_string()))
}

// ---------------------------------------------------------------------------
// Updates
// ---------------------------------------------------------------------------

/// A partial edit. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub content: Option<String>,
    /// Comma-separated tag list; replaces all tags
    pub tags: Option<String>,
    pub title: Option<String>,
    /// `YYYY-MM-DD`, or an empty string to clear the due date
    pub due_date: Option<String>,
}

/// Apply an update in place. Everything is validated before any field
/// changes, so a failed update leaves the task as it was.
pub fn apply_update(task: &mut Task, update: TaskUpdate) -> Result<(), TaskError> {
    let tags = update.tags.as_deref().map(parse_tag_list).transpose()?;
    let due_date = update.due_date.as_deref().map(parse_due_arg).transpose()?;
    if let Some(ref title) = update.title {
        validate_title(title)?;
    }

    if let Some(content) = update.content {
        task.content = content;
    }
    if let Some(tags) = tags {
        task.tags = Some(tags);
    }
    if let Some(title) = update.title {
        task.title = title;
    }
    if let Some(due_date) = due_date {
        task.due_date = due_date;
    }
    Ok(())
}
