use indexmap::IndexMap;

use super::task::Task;

/// A snapshot of every lane on the board and the tasks it holds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    /// Lane name to tasks, in lane order
    pub lanes: IndexMap<String, Vec<Task>>,
}

impl Board {
    pub fn new() -> Self {
        Board::default()
    }

    /// Insert a lane, replacing any tasks it already had
    pub fn insert_lane(&mut self, name: impl Into<String>, tasks: Vec<Task>) {
        self.lanes.insert(name.into(), tasks);
    }

    pub fn lane(&self, name: &str) -> Option<&[Task]> {
        self.lanes.get(name).map(|tasks| tasks.as_slice())
    }

    /// All tasks across lanes, in lane order
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.lanes.values().flatten()
    }

    pub fn total_tasks(&self) -> usize {
        self.lanes.values().map(Vec::len).sum()
    }
}
