use indexmap::IndexMap;
use serde::Serialize;

use crate::model::board::Board;
use crate::parse::DUE_DATE_FORMAT;

/// Bucket for tasks without a due date
pub const NO_DUE_DATE: &str = "No Due Date";

/// Counts across the whole board
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoardStats {
    pub num_lanes: usize,
    pub tasks_per_lane: IndexMap<String, usize>,
    /// Tag to number of tasks carrying it, in first-seen order
    pub tag_counts: IndexMap<String, usize>,
    /// `YYYY-MM-DD` (or [`NO_DUE_DATE`]) to number of tasks, in first-seen order
    pub due_date_counts: IndexMap<String, usize>,
}

impl BoardStats {
    pub fn total_tasks(&self) -> usize {
        self.tasks_per_lane.values().sum()
    }
}

/// Aggregate lane, tag and due-date counts over a board snapshot
pub fn board_stats(board: &Board) -> BoardStats {
    let mut stats = BoardStats {
        num_lanes: board.lanes.len(),
        ..Default::default()
    };

    for (lane, tasks) in &board.lanes {
        stats.tasks_per_lane.insert(lane.clone(), tasks.len());

        for task in tasks {
            for tag in task.tag_list() {
                *stats.tag_counts.entry(tag.clone()).or_insert(0) += 1;
            }

            let key = match task.due_date {
                Some(date) => date.format(DUE_DATE_FORMAT).to_string(),
                None => NO_DUE_DATE.to_string(),
            };
            *stats.due_date_counts.entry(key).or_insert(0) += 1;
        }
    }

    stats
}
