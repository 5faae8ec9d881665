// Data models for the todo list

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    /// Completion timestamp; `None` until the task is marked done.
    /// No command currently sets this.
    #[serde(default)]
    pub done_at: Option<DateTime<Utc>>,
    pub name: String,
    #[serde(default)]
    pub label: String,
    pub completed: bool,
}

impl Task {
    /// Create a fresh, uncompleted task with the given id
    pub fn new(id: i64, name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            done_at: None,
            name: name.into(),
            label: label.into(),
            completed: false,
        }
    }

    /// Checkbox glyph used by the `list` output
    pub fn checkbox(&self) -> &'static str {
        if self.completed { "[✓]" } else { "[ ]" }
    }
}

/// The full ordered task collection, persisted as one unit
///
/// Invariant: immediately after any add or remove completes, ids are
/// exactly `1..=N` in sequence order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    pub tasks: Vec<Task>,
}

impl TaskList {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Renumber every task to its 1-based position in current order
    pub fn reassign_ids(&mut self) {
        for (i, task) in self.tasks.iter_mut().enumerate() {
            task.id = i as i64 + 1;
        }
    }
}
