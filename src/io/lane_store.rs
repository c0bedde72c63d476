use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::model::board::Board;
use crate::model::config::Config;
use crate::model::task::{TASK_EXTENSION, Task};
use crate::ops::split::{has_split_marker, split_task};

/// Error type for lane store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("board directory {0} does not exist")]
    NotADirectory(PathBuf),
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("invalid lane name '{0}'")]
    InvalidLane(String),
    #[error("lane not found: {0}")]
    LaneNotFound(String),
    #[error("task '{0}' not found in any lane")]
    TaskNotFound(String),
    #[error("task '{title}' already exists in lane '{lane}'")]
    TaskExists { title: String, lane: String },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Outcome of splitting every marked task on the board
#[derive(Debug, Default)]
pub struct SplitReport {
    /// Titles of the tasks that were split and archived
    pub originals: Vec<String>,
    /// Locations of the fragments written, relative to the board root
    pub fragments: Vec<PathBuf>,
}

/// Lanes stored as directories of markdown files under a board root.
///
/// The trash directory and hidden directories are never treated as lanes,
/// and only `*.md` files count as tasks.
#[derive(Debug, Clone)]
pub struct LaneStore {
    root: PathBuf,
    trash_dir: PathBuf,
    trash_name: String,
}

impl LaneStore {
    /// Open the board described by `config`, creating its trash directory.
    pub fn open(config: &Config) -> Result<Self, StoreError> {
        let root = config.base_dir.clone();
        if !root.is_dir() {
            return Err(StoreError::NotADirectory(root));
        }
        let trash_dir = root.join(&config.trash_dir);
        fs::create_dir_all(&trash_dir).map_err(|e| StoreError::WriteError {
            path: trash_dir.clone(),
            source: e,
        })?;
        Ok(LaneStore {
            root,
            trash_dir,
            trash_name: config.trash_dir.clone(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn trash_dir(&self) -> &Path {
        &self.trash_dir
    }

    /// Absolute path for a location relative to the board root
    pub fn path_of(&self, location: &Path) -> PathBuf {
        self.root.join(location)
    }

    // -----------------------------------------------------------------------
    // Reading
    // -----------------------------------------------------------------------

    /// Lane names, sorted
    pub fn lane_names(&self) -> Result<Vec<String>, StoreError> {
        let entries = fs::read_dir(&self.root).map_err(|e| StoreError::ReadError {
            path: self.root.clone(),
            source: e,
        })?;

        let mut lanes = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name == self.trash_name || name.starts_with('.') {
                continue;
            }
            lanes.push(name);
        }
        lanes.sort();
        Ok(lanes)
    }

    /// Raw text and board-relative location of every task file in a lane,
    /// sorted by file name
    pub fn read_all(&self, lane: &str) -> Result<Vec<(String, PathBuf)>, StoreError> {
        let lane_dir = self.root.join(lane);
        if !lane_dir.is_dir() {
            return Err(StoreError::LaneNotFound(lane.to_string()));
        }
        let entries = fs::read_dir(&lane_dir).map_err(|e| StoreError::ReadError {
            path: lane_dir.clone(),
            source: e,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == TASK_EXTENSION) {
                files.push((path, entry.file_name()));
            }
        }
        files.sort();

        files
            .into_iter()
            .map(|(path, name)| {
                let text = fs::read_to_string(&path).map_err(|e| StoreError::ReadError {
                    path: path.clone(),
                    source: e,
                })?;
                Ok((text, Path::new(lane).join(name)))
            })
            .collect()
    }

    /// Decode every task in one lane
    pub fn load_lane(&self, lane: &str) -> Result<Vec<Task>, StoreError> {
        Ok(self
            .read_all(lane)?
            .iter()
            .map(|(text, location)| Task::load(text, lane, location))
            .collect())
    }

    /// Load every lane into a board snapshot
    pub fn load_board(&self) -> Result<Board, StoreError> {
        let mut board = Board::new();
        for lane in self.lane_names()? {
            let tasks = self.load_lane(&lane)?;
            debug!(lane = %lane, count = tasks.len(), "loaded lane");
            board.insert_lane(lane, tasks);
        }
        Ok(board)
    }

    // -----------------------------------------------------------------------
    // Writing
    // -----------------------------------------------------------------------

    /// Encode and write a task at its location, replacing any file already
    /// there and creating the lane directory if needed. Returns the absolute
    /// path written.
    pub fn write(&self, task: &Task) -> Result<PathBuf, StoreError> {
        self.write_text(&task.location(), &task.save())
    }

    /// Write a new task. Fails with `TaskExists` instead of replacing a file.
    pub fn create(&self, task: &Task) -> Result<PathBuf, StoreError> {
        self.ensure_absent(task)?;
        self.write(task)
    }

    /// Atomically write raw text at a board-relative location
    pub fn write_text(&self, location: &Path, text: &str) -> Result<PathBuf, StoreError> {
        let path = self.path_of(location);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| StoreError::WriteError {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }
        atomic_write(&path, text.as_bytes()).map_err(|e| StoreError::WriteError {
            path: path.clone(),
            source: e,
        })?;
        debug!(path = %path.display(), "wrote file");
        Ok(path)
    }

    fn ensure_absent(&self, task: &Task) -> Result<(), StoreError> {
        if self.path_of(&task.location()).exists() {
            return Err(StoreError::TaskExists {
                title: task.title.clone(),
                lane: task.lane.clone(),
            });
        }
        Ok(())
    }

    /// Move a task file into the trash. A name already taken in the trash
    /// gets a numeric suffix (`a-1.md`, `a-2.md`, ...). Returns the new
    /// absolute path.
    pub fn archive(&self, location: &Path) -> Result<PathBuf, StoreError> {
        let from = self.path_of(location);
        let stem = from
            .file_stem()
            .ok_or_else(|| StoreError::TaskNotFound(location.display().to_string()))?
            .to_string_lossy()
            .into_owned();
        let to = self.free_trash_path(&stem);
        fs::rename(&from, &to).map_err(|e| StoreError::WriteError {
            path: from.clone(),
            source: e,
        })?;
        info!(from = %from.display(), "archived task");
        Ok(to)
    }

    fn free_trash_path(&self, stem: &str) -> PathBuf {
        let mut candidate = self.trash_dir.join(format!("{}.{}", stem, TASK_EXTENSION));
        let mut n = 0;
        while candidate.exists() {
            n += 1;
            candidate = self
                .trash_dir
                .join(format!("{}-{}.{}", stem, n, TASK_EXTENSION));
        }
        candidate
    }

    /// Delete a task file outright
    pub fn remove(&self, location: &Path) -> Result<(), StoreError> {
        let path = self.path_of(location);
        fs::remove_file(&path).map_err(|e| StoreError::WriteError { path, source: e })
    }

    /// Create a lane directory. Existing lanes are left alone.
    pub fn add_lane(&self, name: &str) -> Result<PathBuf, StoreError> {
        let trimmed = name.trim();
        if trimmed.is_empty()
            || trimmed.starts_with('.')
            || trimmed.contains('/')
            || trimmed.contains('\\')
            || trimmed == self.trash_name
        {
            return Err(StoreError::InvalidLane(name.to_string()));
        }
        let dir = self.root.join(trimmed);
        fs::create_dir_all(&dir).map_err(|e| StoreError::WriteError {
            path: dir.clone(),
            source: e,
        })?;
        Ok(dir)
    }

    /// Move the task titled `title` into `new_lane`, creating the lane if it
    /// does not exist. Returns the lane the task came from.
    pub fn move_task(&self, title: &str, new_lane: &str) -> Result<String, StoreError> {
        let file_name = format!("{}.{}", title, TASK_EXTENSION);
        let from_lane = self
            .lane_names()?
            .into_iter()
            .find(|lane| self.root.join(lane).join(&file_name).is_file())
            .ok_or_else(|| StoreError::TaskNotFound(title.to_string()))?;

        let target_dir = self.add_lane(new_lane)?;
        let from = self.root.join(&from_lane).join(&file_name);
        let to = target_dir.join(&file_name);
        if from_lane != new_lane.trim() && to.exists() {
            return Err(StoreError::TaskExists {
                title: title.to_string(),
                lane: new_lane.to_string(),
            });
        }
        fs::rename(&from, &to).map_err(|e| StoreError::WriteError {
            path: from.clone(),
            source: e,
        })?;
        info!(title, from = %from_lane, to = new_lane, "moved task");
        Ok(from_lane)
    }

    /// Permanently delete every task file in the trash. Returns how many
    /// files were removed.
    pub fn empty_trash(&self) -> Result<usize, StoreError> {
        let entries = fs::read_dir(&self.trash_dir).map_err(|e| StoreError::ReadError {
            path: self.trash_dir.clone(),
            source: e,
        })?;
        let mut removed = 0;
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == TASK_EXTENSION) {
                fs::remove_file(&path).map_err(|e| StoreError::WriteError {
                    path: path.clone(),
                    source: e,
                })?;
                removed += 1;
            }
        }
        info!(removed, "emptied trash");
        Ok(removed)
    }

    /// Split every task holding the split marker: write its fragments into
    /// the same lane, then archive the original.
    ///
    /// If any fragment would land on an existing file nothing is written and
    /// `TaskExists` names the first collision.
    pub fn split_all(&self) -> Result<SplitReport, StoreError> {
        let board = self.load_board()?;
        let mut report = SplitReport::default();

        let plan: Vec<(&Task, Vec<Task>)> = board
            .tasks()
            .filter(|t| has_split_marker(t))
            .map(|t| (t, split_task(t)))
            .collect();
        for fragment in plan.iter().flat_map(|(_, fragments)| fragments) {
            self.ensure_absent(fragment)?;
        }

        for (task, fragments) in plan {
            for fragment in &fragments {
                self.write(fragment)?;
                report.fragments.push(fragment.location());
            }
            self.archive(&task.location())?;
            info!(title = %task.title, parts = fragments.len(), "split task");
            report.originals.push(task.title.clone());
        }

        Ok(report)
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::split::SPLIT_TAG;
    use tempfile::TempDir;

    fn setup_board() -> (TempDir, LaneStore) {
        let tmp = TempDir::new().unwrap();
        for lane in ["todo", "doing", "done"] {
            fs::create_dir_all(tmp.path().join(lane)).unwrap();
        }
        let config = Config {
            base_dir: tmp.path().to_path_buf(),
            ..Default::default()
        };
        let store = LaneStore::open(&config).unwrap();
        (tmp, store)
    }

    #[test]
    fn test_open_creates_trash() {
        let (tmp, store) = setup_board();
        assert_eq!(store.trash_dir(), tmp.path().join("Trash"));
        assert!(store.trash_dir().is_dir());
    }

    #[test]
    fn test_open_missing_root() {
        let tmp = TempDir::new().unwrap();
        let config = Config {
            base_dir: tmp.path().join("missing"),
            ..Default::default()
        };
        assert!(matches!(
            LaneStore::open(&config),
            Err(StoreError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_load_board_empty_lanes() {
        let (_tmp, store) = setup_board();
        let board = store.load_board().unwrap();
        assert_eq!(board.lanes.len(), 3);
        assert!(board.lanes.values().all(|tasks| tasks.is_empty()));
    }

    #[test]
    fn test_load_board_with_tasks() {
        let (tmp, store) = setup_board();
        fs::write(tmp.path().join("todo/task1.md"), "Task 1 content").unwrap();
        fs::write(tmp.path().join("todo/task2.md"), "[tag:urgent]\n\nTask 2").unwrap();
        fs::write(tmp.path().join("doing/task3.md"), "[due:2025-12-31]\n\nTask 3").unwrap();
        fs::write(tmp.path().join("doing/notes.txt"), "not a task").unwrap();

        let board = store.load_board().unwrap();
        assert_eq!(board.lane("todo").unwrap().len(), 2);
        assert_eq!(board.lane("doing").unwrap().len(), 1);
        assert_eq!(board.lane("done").unwrap().len(), 0);

        let task2 = &board.lane("todo").unwrap()[1];
        assert_eq!(task2.title, "task2");
        assert_eq!(task2.tags, Some(vec!["urgent".to_string()]));
        assert_eq!(task2.content, "Task 2");
    }

    #[test]
    fn test_load_board_ignores_trash_and_hidden() {
        let (tmp, store) = setup_board();
        fs::write(tmp.path().join("Trash/trashed-task.md"), "Trashed").unwrap();
        fs::create_dir_all(tmp.path().join(".git")).unwrap();
        let board = store.load_board().unwrap();
        assert!(!board.lanes.contains_key("Trash"));
        assert!(!board.lanes.contains_key(".git"));
        assert_eq!(board.total_tasks(), 0);
    }

    #[test]
    fn test_write_creates_lane_and_encodes() {
        let (tmp, store) = setup_board();
        let mut task = Task::new("new-task", "Task content", "review");
        task.tags = Some(vec!["test".to_string()]);
        let path = store.write(&task).unwrap();
        assert_eq!(path, tmp.path().join("review/new-task.md"));
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "[tag:test]\n\nTask content"
        );
    }

    #[test]
    fn test_archive_moves_to_trash() {
        let (tmp, store) = setup_board();
        fs::write(tmp.path().join("todo/old.md"), "old").unwrap();
        let to = store.archive(Path::new("todo/old.md")).unwrap();
        assert_eq!(to, tmp.path().join("Trash/old.md"));
        assert!(to.exists());
        assert!(!tmp.path().join("todo/old.md").exists());
    }

    #[test]
    fn test_add_lane() {
        let (tmp, store) = setup_board();
        store.add_lane("backlog").unwrap();
        assert!(tmp.path().join("backlog").is_dir());
        store.add_lane("todo").unwrap();
        assert!(matches!(store.add_lane("Trash"), Err(StoreError::InvalidLane(_))));
        assert!(matches!(store.add_lane("a/b"), Err(StoreError::InvalidLane(_))));
    }

    #[test]
    fn test_move_task_creates_lane() {
        let (tmp, store) = setup_board();
        fs::write(tmp.path().join("todo/task-to-move.md"), "Task content").unwrap();
        let from = store.move_task("task-to-move", "review").unwrap();
        assert_eq!(from, "todo");
        assert!(!tmp.path().join("todo/task-to-move.md").exists());
        assert!(tmp.path().join("review/task-to-move.md").exists());
    }

    #[test]
    fn test_move_task_not_found() {
        let (_tmp, store) = setup_board();
        assert!(matches!(
            store.move_task("non-existent-task", "doing"),
            Err(StoreError::TaskNotFound(_))
        ));
    }

    #[test]
    fn test_empty_trash() {
        let (tmp, store) = setup_board();
        for name in ["trash1.md", "trash2.md", "trash3.md"] {
            fs::write(tmp.path().join("Trash").join(name), "x").unwrap();
        }
        fs::write(tmp.path().join("Trash/keep.txt"), "x").unwrap();
        assert_eq!(store.empty_trash().unwrap(), 3);
        assert!(tmp.path().join("Trash/keep.txt").exists());
    }

    #[test]
    fn test_split_all() {
        let (tmp, store) = setup_board();
        fs::write(
            tmp.path().join("todo/tagged-split.md"),
            "[tag:urgent]\n[tag:bug]\n\nPart 1[[split]]Part 2",
        )
        .unwrap();
        fs::write(tmp.path().join("todo/normal-task.md"), "Normal task content").unwrap();

        let report = store.split_all().unwrap();
        assert_eq!(report.originals, vec!["tagged-split".to_string()]);
        assert_eq!(report.fragments.len(), 2);

        assert!(tmp.path().join("Trash/tagged-split.md").exists());
        assert!(tmp.path().join("todo/normal-task.md").exists());
        assert!(!tmp.path().join("Trash/normal-task.md").exists());

        let first = fs::read_to_string(tmp.path().join("todo/1-tagged-split.md")).unwrap();
        assert_eq!(
            first,
            format!("[tag:urgent]\n[tag:bug]\n[tag:{}]\n\nPart 1", SPLIT_TAG)
        );
        let second = fs::read_to_string(tmp.path().join("todo/2-tagged-split.md")).unwrap();
        assert!(second.ends_with("\n\nPart 2"));
    }

    #[test]
    fn test_archive_keeps_both_copies_on_name_clash() {
        let (tmp, store) = setup_board();
        fs::write(tmp.path().join("todo/a.md"), "first").unwrap();
        fs::write(tmp.path().join("doing/a.md"), "second").unwrap();

        let first = store.archive(Path::new("todo/a.md")).unwrap();
        let second = store.archive(Path::new("doing/a.md")).unwrap();
        assert_eq!(first, tmp.path().join("Trash/a.md"));
        assert_eq!(second, tmp.path().join("Trash/a-1.md"));
        assert_eq!(fs::read_to_string(first).unwrap(), "first");
        assert_eq!(fs::read_to_string(second).unwrap(), "second");
    }

    #[test]
    fn test_create_refuses_existing_file() {
        let (tmp, store) = setup_board();
        fs::write(tmp.path().join("todo/taken.md"), "keep me").unwrap();
        let task = Task::new("taken", "replacement", "todo");
        assert!(matches!(
            store.create(&task),
            Err(StoreError::TaskExists { .. })
        ));
        assert_eq!(
            fs::read_to_string(tmp.path().join("todo/taken.md")).unwrap(),
            "keep me"
        );
        store.create(&Task::new("fresh", "", "todo")).unwrap();
    }

    #[test]
    fn test_move_task_refuses_to_replace() {
        let (tmp, store) = setup_board();
        fs::write(tmp.path().join("todo/dup.md"), "todo copy").unwrap();
        fs::write(tmp.path().join("doing/dup.md"), "doing copy").unwrap();
        assert!(matches!(
            store.move_task("dup", "doing"),
            Err(StoreError::TaskExists { .. })
        ));
        assert_eq!(
            fs::read_to_string(tmp.path().join("doing/dup.md")).unwrap(),
            "doing copy"
        );
        assert!(tmp.path().join("todo/dup.md").exists());
    }

    #[test]
    fn test_split_all_refuses_fragment_collision() {
        let (tmp, store) = setup_board();
        fs::write(tmp.path().join("todo/epic.md"), "one[[split]]two").unwrap();
        fs::write(tmp.path().join("todo/1-epic.md"), "already here").unwrap();

        assert!(matches!(
            store.split_all(),
            Err(StoreError::TaskExists { .. })
        ));
        assert_eq!(
            fs::read_to_string(tmp.path().join("todo/1-epic.md")).unwrap(),
            "already here"
        );
        assert!(!tmp.path().join("todo/2-epic.md").exists());
        assert!(tmp.path().join("todo/epic.md").exists());
    }

    #[test]
    fn test_write_text_replaces_atomically() {
        let (tmp, store) = setup_board();
        fs::write(tmp.path().join("done/notes.md"), "old").unwrap();
        let path = store.write_text(Path::new("done/notes.md"), "new").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "new");
        let leftovers = fs::read_dir(tmp.path().join("done")).unwrap().count();
        assert_eq!(leftovers, 1);
    }
}
