use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use validator::Validate;

/// A card living in a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i32,
    pub column_id: i32,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewTask {
    /// Must reference an existing column; zero means "missing".
    #[serde(default)]
    pub column_id: i32,
    /// Unique across every task in the store.
    #[serde(default)]
    #[validate(length(max = 255))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,
}

/// Partial update of a task's title and/or description.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TaskPatch {
    #[validate(length(max = 255))]
    pub title: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Kind of task mutation recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskAction {
    Create,
    Update,
    Delete,
}

impl TaskAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskAction::Create => "create",
            TaskAction::Update => "update",
            TaskAction::Delete => "delete",
        }
    }
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted audit entry. Rows are append-only; `task_id` may refer to a deleted task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TaskLog {
    pub id: i32,
    pub task_id: i32,
    pub action_type: String,
    pub log_message: String,
    pub created_at: DateTime<Utc>,
}

/// An audit entry waiting to be written alongside its task mutation.
/// The store supplies `task_id` and the row id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskLog {
    pub action: TaskAction,
    pub log_message: String,
    pub created_at: DateTime<Utc>,
}
