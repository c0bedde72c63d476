use crate::model::task::Task;
use crate::parse::extract_annotations;

/// Content token marking where a task should be divided
pub const SPLIT_MARKER: &str = "[[split]]";

/// Tag added to every fragment produced by a split
pub const SPLIT_TAG: &str = "multi-story feature";

pub fn has_split_marker(task: &Task) -> bool {
    task.content.contains(SPLIT_MARKER)
}

/// Divide a task at every split marker.
///
/// Fragment `i` (from 1) is titled `{i}-{title}`, keeps the lane and due date,
/// and carries the original tags plus [`SPLIT_TAG`]. Empty segments are kept
/// as empty bodies. Without a marker the task comes back unchanged as the
/// only element.
///
/// Cutting can leave a segment line that is a complete annotation (the text
/// `[tag:x][[split]]` is body until the marker goes). Such lines are lifted
/// out of the fragment body: tags join the fragment's tags and a valid due
/// date replaces the inherited one.
pub fn split_task(task: &Task) -> Vec<Task> {
    if !has_split_marker(task) {
        return vec![task.clone()];
    }

    task.content
        .split(SPLIT_MARKER)
        .enumerate()
        .map(|(i, segment)| {
            let lifted = extract_annotations(segment);
            let mut tags = task.tag_list().to_vec();
            for tag in lifted.tags.iter().flatten().map(String::as_str).chain([SPLIT_TAG]) {
                if !tags.iter().any(|t| t == tag) {
                    tags.push(tag.to_string());
                }
            }
            Task {
                title: format!("{}-{}", i + 1, task.title),
                content: lifted.body,
                tags: Some(tags),
                due_date: lifted.due_date.or(task.due_date),
                lane: task.lane.clone(),
            }
        })
        .collect()
}
