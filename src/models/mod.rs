pub mod board;
pub mod column;
pub mod member;
pub mod project;
pub mod task;
pub mod user;

pub use board::{Board, BoardPatch, BoardWithColumns, NewBoard, DEFAULT_COLUMN_STATUSES};
pub use column::{Column, ColumnPatch, NewColumn};
pub use member::{MemberRemoval, NewMember, ProjectMember, ProjectMemberInfo, OWNER_ROLE};
pub use project::{NewProject, Project, ProjectPatch};
pub use task::{NewTask, NewTaskLog, Task, TaskAction, TaskLog, TaskPatch};
pub use user::{User, UserCredentials};

use serde::{Deserialize, Serialize};

/// Plain confirmation body for deletes and membership changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub message: String,
}

impl Confirmation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
