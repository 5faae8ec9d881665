// Whole-file JSON persistence for the task list

use crate::models::{Task, TaskList};
use eyre::{Context, Result};
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const STORE_DIR: &str = "todoCLI";
const STORE_FILE: &str = "tasks.json";
const EMPTY_STORE: &str = r#"{"tasks":[]}"#;

/// Persistent store for the task collection
///
/// Holds only the resolved file path; every operation reads the full
/// collection from disk and mutating operations write it back in full.
/// There is no partial update and no state between invocations.
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    /// Open or create a store under the given root directory
    ///
    /// The task file lives at `<root>/todoCLI/tasks.json` and is seeded
    /// with an empty collection on first run.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let dir = root.as_ref().join(STORE_DIR);

        fs::create_dir_all(&dir).context("Failed to create store directory")?;

        let path = dir.join(STORE_FILE);
        if !path.exists() {
            fs::write(&path, EMPTY_STORE).context("Failed to create task file")?;
            debug!(path = ?path, "Seeded empty task file");
        }

        Ok(Self { path })
    }

    /// Path of the persisted task file
    pub fn path(&self) -> &Path {
        &self.path
    }

    // ========================================================================
    // Load / save
    // ========================================================================

    /// Read the full task collection from disk
    ///
    /// A missing, unreadable, or unparseable file yields an empty
    /// collection; a corrupted file is indistinguishable from "no tasks
    /// yet". The failure is logged but never surfaced to the caller.
    pub fn load(&self) -> TaskList {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(path = ?self.path, error = ?err, "Failed to read task file, treating as empty");
                return TaskList::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(list) => list,
            Err(err) => {
                warn!(path = ?self.path, error = ?err, "Failed to parse task file, treating as empty");
                TaskList::default()
            }
        }
    }

    /// Overwrite the task file with the given collection
    pub fn save(&self, list: &TaskList) -> Result<()> {
        let json = serde_json::to_string_pretty(list).context("Failed to serialize task list")?;

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .context("Failed to open task file for writing")?;

        // Acquire exclusive lock before writing
        file.lock_exclusive().context("Failed to acquire file lock")?;

        file.write_all(json.as_bytes()).context("Failed to write task file")?;
        file.sync_all()?;

        // Lock is automatically released when file is dropped
        Ok(())
    }

    // ========================================================================
    // Collection operations
    // ========================================================================

    /// Number of tasks currently persisted; 0 on any load failure
    pub fn count(&self) -> usize {
        self.load().len()
    }

    /// Whether any persisted task has the given id
    pub fn exists(&self, id: i64) -> bool {
        self.load().tasks.iter().any(|task| task.id == id)
    }

    /// Append a task to the end of the collection
    ///
    /// The caller computes the id as `count() + 1` before constructing
    /// the task; with a single process per invocation the count cannot
    /// go stale in between.
    pub fn add(&self, task: Task) -> Result<()> {
        let mut list = self.load();
        list.tasks.push(task);
        self.save(&list)
    }

    /// Remove the task with the given id and renumber the survivors
    ///
    /// Ids are dense and 1-based again once this returns. When no task
    /// matches, the unchanged collection is still written back; callers
    /// check `exists` first to report not-found.
    pub fn remove(&self, id: i64) -> Result<()> {
        let mut list = self.load();

        if let Some(pos) = list.tasks.iter().position(|task| task.id == id) {
            list.tasks.remove(pos);
            list.reassign_ids();
            debug!(id, remaining = list.len(), "Removed task");
        }

        self.save(&list)
    }

    /// Truncate the store to an empty collection
    ///
    /// Overwrites without reading; current contents are irrelevant.
    pub fn remove_all(&self) -> Result<()> {
        self.save(&TaskList::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn task_at(id: i64, name: &str) -> Task {
        Task {
            id,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            done_at: None,
            name: name.to_string(),
            label: String::new(),
            completed: false,
        }
    }

    #[test]
    fn test_open_seeds_empty_store() {
        let temp = TempDir::new().unwrap();

        let store = TaskStore::open(temp.path()).unwrap();

        let path = temp.path().join("todoCLI/tasks.json");
        assert!(path.exists());
        assert_eq!(store.path(), path);
        assert_eq!(fs::read_to_string(path).unwrap(), r#"{"tasks":[]}"#);
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_open_keeps_existing_file() {
        let temp = TempDir::new().unwrap();

        let store = TaskStore::open(temp.path()).unwrap();
        store.add(task_at(1, "Buy milk")).unwrap();

        // Re-opening must not reseed
        let store = TaskStore::open(temp.path()).unwrap();
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_save_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = TaskStore::open(temp.path()).unwrap();

        let list = TaskList {
            tasks: vec![task_at(1, "Buy milk"), task_at(2, "Water plants")],
        };
        store.save(&list).unwrap();

        assert_eq!(store.load(), list);
    }

    #[test]
    fn test_load_corrupted_file_yields_empty() {
        let temp = TempDir::new().unwrap();
        let store = TaskStore::open(temp.path()).unwrap();

        fs::write(store.path(), "{not json").unwrap();

        assert!(store.load().is_empty());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_load_missing_file_yields_empty() {
        let temp = TempDir::new().unwrap();
        let store = TaskStore::open(temp.path()).unwrap();

        fs::remove_file(store.path()).unwrap();

        assert!(store.load().is_empty());
    }

    #[test]
    fn test_add_increments_count() {
        let temp = TempDir::new().unwrap();
        let store = TaskStore::open(temp.path()).unwrap();

        let before = store.count();
        store.add(task_at(before as i64 + 1, "Buy milk")).unwrap();
        assert_eq!(store.count(), before + 1);

        store.add(task_at(2, "Water plants")).unwrap();
        assert_eq!(store.count(), 2);

        // Insertion order is preserved
        let names: Vec<String> = store.load().tasks.into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["Buy milk", "Water plants"]);
    }

    #[test]
    fn test_exists() {
        let temp = TempDir::new().unwrap();
        let store = TaskStore::open(temp.path()).unwrap();

        store.add(task_at(1, "Buy milk")).unwrap();

        assert!(store.exists(1));
        assert!(!store.exists(2));
        assert!(!store.exists(-1));
    }

    #[test]
    fn test_remove_reassigns_dense_ids() {
        let temp = TempDir::new().unwrap();
        let store = TaskStore::open(temp.path()).unwrap();

        for (id, name) in [(1, "a"), (2, "b"), (3, "c")] {
            store.add(task_at(id, name)).unwrap();
        }

        store.remove(2).unwrap();

        let list = store.load();
        let ids: Vec<i64> = list.tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
        let names: Vec<&str> = list.tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_remove_first_and_last() {
        let temp = TempDir::new().unwrap();
        let store = TaskStore::open(temp.path()).unwrap();

        for (id, name) in [(1, "a"), (2, "b"), (3, "c")] {
            store.add(task_at(id, name)).unwrap();
        }

        store.remove(1).unwrap();
        store.remove(2).unwrap(); // formerly "c"

        let list = store.load();
        assert_eq!(list.len(), 1);
        assert_eq!(list.tasks[0].id, 1);
        assert_eq!(list.tasks[0].name, "b");
    }

    #[test]
    fn test_remove_nonexistent_rewrites_unchanged() {
        let temp = TempDir::new().unwrap();
        let store = TaskStore::open(temp.path()).unwrap();

        store.add(task_at(1, "Buy milk")).unwrap();
        let before = store.load();

        store.remove(42).unwrap();

        assert_eq!(store.load(), before);
    }

    #[test]
    fn test_remove_all_truncates() {
        let temp = TempDir::new().unwrap();
        let store = TaskStore::open(temp.path()).unwrap();

        store.add(task_at(1, "Buy milk")).unwrap();
        store.add(task_at(2, "Water plants")).unwrap();

        store.remove_all().unwrap();

        assert_eq!(store.count(), 0);
        let raw = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["tasks"], serde_json::json!([]));
    }

    #[test]
    fn test_remove_all_ignores_corrupted_contents() {
        let temp = TempDir::new().unwrap();
        let store = TaskStore::open(temp.path()).unwrap();

        fs::write(store.path(), "{not json").unwrap();

        store.remove_all().unwrap();
        assert!(store.load().is_empty());
    }
}
