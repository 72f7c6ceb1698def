//! Persistence boundary for users, projects, memberships, boards, columns, tasks and task logs.
//!
//! Services only talk to the [`Store`] trait. [`PgStore`] is the production implementation on
//! top of `sqlx`; [`MemoryStore`] keeps the same tables and constraints in process and backs the
//! test suite and `KANBAN_STORE=memory` runs.
//!
//! Every method that changes more than one row (`*_with_*`) is all-or-nothing.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use std::fmt;

use crate::error::AppError;
use crate::models::{
    Board, BoardWithColumns, Column, NewBoard, NewColumn, NewProject, NewTask, NewTaskLog,
    Project, ProjectMember, ProjectMemberInfo, Task, TaskLog, User, UserCredentials,
};

/// The kinds of record the integrity rules talk about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Project,
    Membership,
    Board,
    Column,
    Task,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            EntityKind::User => "User",
            EntityKind::Project => "Project",
            EntityKind::Membership => "Membership",
            EntityKind::Board => "Board",
            EntityKind::Column => "Column",
            EntityKind::Task => "Task",
        };
        f.write_str(label)
    }
}

/// A declared parent reference whose existence is checked before a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRef {
    User(i32),
    Project(i32),
    Board(i32),
    Column(i32),
}

impl ParentRef {
    pub fn kind(&self) -> EntityKind {
        match self {
            ParentRef::User(_) => EntityKind::User,
            ParentRef::Project(_) => EntityKind::Project,
            ParentRef::Board(_) => EntityKind::Board,
            ParentRef::Column(_) => EntityKind::Column,
        }
    }

    pub fn id(&self) -> i32 {
        match *self {
            ParentRef::User(id)
            | ParentRef::Project(id)
            | ParentRef::Board(id)
            | ParentRef::Column(id) => id,
        }
    }
}

/// The uniqueness key of a proposed record, together with its scope.
///
/// Names, statuses, titles and emails are unique across the whole table, not per parent.
/// Only memberships are scoped, to the (project, user) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaturalKey<'a> {
    UserEmail(&'a str),
    ProjectName(&'a str),
    BoardName(&'a str),
    ColumnStatus(&'a str),
    TaskTitle(&'a str),
    Membership { project_id: i32, user_id: i32 },
}

impl NaturalKey<'_> {
    pub fn kind(&self) -> EntityKind {
        match self {
            NaturalKey::UserEmail(_) => EntityKind::User,
            NaturalKey::ProjectName(_) => EntityKind::Project,
            NaturalKey::BoardName(_) => EntityKind::Board,
            NaturalKey::ColumnStatus(_) => EntityKind::Column,
            NaturalKey::TaskTitle(_) => EntityKind::Task,
            NaturalKey::Membership { .. } => EntityKind::Membership,
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    // ---- integrity probes ----

    async fn parent_exists(&self, parent: ParentRef) -> Result<bool, AppError>;

    async fn natural_key_taken(&self, key: NaturalKey<'_>) -> Result<bool, AppError>;

    // ---- users ----

    async fn insert_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserCredentials>, AppError>;

    // ---- projects ----

    /// Inserts the project and binds its creator in `project_users` with `owner_role`.
    async fn insert_project_with_owner(
        &self,
        project: &NewProject,
        owner_role: &str,
    ) -> Result<Project, AppError>;

    async fn get_project(&self, id: i32) -> Result<Option<Project>, AppError>;

    async fn list_projects(&self) -> Result<Vec<Project>, AppError>;

    /// Writes whichever of `name` / `description` is `Some`.
    async fn update_project(
        &self,
        id: i32,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<(), AppError>;

    /// Returns the number of rows removed. Boards, columns, tasks and memberships cascade.
    async fn delete_project(&self, id: i32) -> Result<u64, AppError>;

    // ---- boards ----

    /// Inserts the board and one column per entry of `statuses`, in order.
    async fn insert_board_with_columns(
        &self,
        board: &NewBoard,
        statuses: &[&str],
    ) -> Result<BoardWithColumns, AppError>;

    async fn get_board(&self, id: i32) -> Result<Option<Board>, AppError>;

    async fn list_boards(&self) -> Result<Vec<Board>, AppError>;

    async fn list_boards_by_project(&self, project_id: i32) -> Result<Vec<Board>, AppError>;

    async fn rename_board(&self, id: i32, name: &str) -> Result<(), AppError>;

    async fn delete_board(&self, id: i32) -> Result<u64, AppError>;

    // ---- columns ----

    async fn insert_column(&self, column: &NewColumn) -> Result<Column, AppError>;

    async fn get_column(&self, id: i32) -> Result<Option<Column>, AppError>;

    async fn list_columns(&self) -> Result<Vec<Column>, AppError>;

    async fn list_columns_by_board(&self, board_id: i32) -> Result<Vec<Column>, AppError>;

    async fn set_column_status(&self, id: i32, status: &str) -> Result<(), AppError>;

    async fn delete_column(&self, id: i32) -> Result<u64, AppError>;

    // ---- tasks ----

    /// Inserts the task stamped with `log.created_at` and its creation log entry.
    async fn insert_task_with_log(&self, task: &NewTask, log: &NewTaskLog)
        -> Result<Task, AppError>;

    async fn get_task(&self, id: i32) -> Result<Option<Task>, AppError>;

    async fn list_tasks(&self) -> Result<Vec<Task>, AppError>;

    async fn list_tasks_by_column(&self, column_id: i32) -> Result<Vec<Task>, AppError>;

    /// Writes whichever of `title` / `description` is `Some`, then appends `log`. Returns `0`
    /// without writing anything when the task does not exist.
    async fn update_task_with_log(
        &self,
        id: i32,
        title: Option<&str>,
        description: Option<&str>,
        log: &NewTaskLog,
    ) -> Result<u64, AppError>;

    /// Deletes the task and appends `log`. When nothing was deleted no log is written and
    /// `0` is returned.
    async fn delete_task_with_log(&self, id: i32, log: &NewTaskLog) -> Result<u64, AppError>;

    /// Audit trail of a task, oldest first.
    async fn list_task_logs(&self, task_id: i32) -> Result<Vec<TaskLog>, AppError>;

    // ---- memberships ----

    async fn insert_member(&self, member: &ProjectMember) -> Result<(), AppError>;

    async fn delete_member(&self, project_id: i32, user_id: i32) -> Result<u64, AppError>;

    async fn list_members(&self, project_id: i32) -> Result<Vec<ProjectMemberInfo>, AppError>;
}
