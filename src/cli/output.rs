use serde::Serialize;

use crate::io::lane_store::LaneStore;
use crate::model::board::Board;
use crate::model::task::Task;
use crate::ops::stats::BoardStats;
use crate::parse::DUE_DATE_FORMAT;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub title: String,
    pub content: String,
    pub lane: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub location: String,
}

#[derive(Serialize)]
pub struct TaskListJson {
    pub tasks: Vec<TaskJson>,
    pub count: usize,
    pub filters: FiltersJson,
}

#[derive(Serialize)]
pub struct FiltersJson {
    pub lane: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
}

#[derive(Serialize)]
pub struct LaneJson {
    pub name: String,
    pub task_count: usize,
}

#[derive(Serialize)]
pub struct LanesJson {
    pub lanes: Vec<LaneJson>,
    pub total_lanes: usize,
}

#[derive(Serialize)]
pub struct SplitJson {
    pub message: String,
    pub tasks_split: usize,
    pub original_tasks: Vec<String>,
    pub total_tasks_after: usize,
}

#[derive(Serialize)]
pub struct ImportJson {
    pub created: Vec<TaskJson>,
    pub skipped: Vec<SkippedRowJson>,
}

#[derive(Serialize)]
pub struct SkippedRowJson {
    pub row: usize,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Serialize a task with its absolute location on the board
pub fn task_to_json(task: &Task, store: &LaneStore) -> TaskJson {
    TaskJson {
        title: task.title.clone(),
        content: task.content.clone(),
        lane: task.lane.clone(),
        tags: task.tag_list().to_vec(),
        due_date: task.due_date.map(|d| d.format(DUE_DATE_FORMAT).to_string()),
        location: store.path_of(&task.location()).display().to_string(),
    }
}

pub fn lanes_to_json(board: &Board) -> LanesJson {
    LanesJson {
        lanes: board
            .lanes
            .iter()
            .map(|(name, tasks)| LaneJson {
                name: name.clone(),
                task_count: tasks.len(),
            })
            .collect(),
        total_lanes: board.lanes.len(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// One-line summary: `title #tag1 #tag2 (due 2025-12-31)`
pub fn format_task_line(task: &Task) -> String {
    let mut line = task.title.clone();
    for tag in task.tag_list() {
        line.push_str(&format!(" #{}", tag));
    }
    if let Some(date) = task.due_date {
        line.push_str(&format!(" (due {})", date.format(DUE_DATE_FORMAT)));
    }
    line
}

/// Tasks grouped under a header per lane
pub fn format_task_list(tasks: &[&Task]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_lane: Option<&str> = None;
    for task in tasks {
        if current_lane != Some(task.lane.as_str()) {
            if current_lane.is_some() {
                lines.push(String::new());
            }
            lines.push(format!("{}:", task.lane));
            current_lane = Some(task.lane.as_str());
        }
        lines.push(format!("  {}", format_task_line(task)));
    }
    lines
}

/// Detailed view of one task
pub fn format_task_detail(task: &Task) -> Vec<String> {
    let mut lines = vec![
        format!("Title: {}", task.title),
        format!("Lane: {}", task.lane),
    ];
    if !task.tag_list().is_empty() {
        lines.push(format!("Tags: {}", task.tag_list().join(", ")));
    }
    if let Some(date) = task.due_date {
        lines.push(format!("Due: {}", date.format(DUE_DATE_FORMAT)));
    }
    if !task.content.is_empty() {
        lines.push(String::new());
        lines.extend(task.content.lines().map(|l| l.to_string()));
    }
    lines
}

/// Statistics as aligned `key  count` rows under section headers
pub fn format_stats(stats: &BoardStats) -> Vec<String> {
    let mut lines = vec![format!("Lanes: {}", stats.num_lanes)];
    let sections = [
        ("Tasks per lane", &stats.tasks_per_lane),
        ("Tags", &stats.tag_counts),
        ("Due dates", &stats.due_date_counts),
    ];
    for (header, counts) in sections {
        lines.push(String::new());
        lines.push(format!("{}:", header));
        let width = counts.keys().map(|k| k.chars().count()).max().unwrap_or(0);
        for (key, count) in counts {
            lines.push(format!("  {:<width$}  {}", key, count, width = width));
        }
    }
    lines
}
