use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{NaturalKey, ParentRef, Store};
use crate::error::AppError;
use crate::models::{
    Board, BoardWithColumns, Column, NewBoard, NewColumn, NewProject, NewTask, NewTaskLog,
    Project, ProjectMember, ProjectMemberInfo, Task, TaskLog, User, UserCredentials,
};

const PROJECT_COLUMNS: &str = "id, user_id, name, description, created_at";
const TASK_COLUMNS: &str = "id, column_id, title, description, created_at";

/// PostgreSQL-backed [`Store`]. Composite writes run inside one `sqlx` transaction.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a pool of at most `max_connections` and applies the embedded migrations.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        log::info!("database migrations applied");
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn parent_exists(&self, parent: ParentRef) -> Result<bool, AppError> {
        let sql = match parent {
            ParentRef::User(_) => "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)",
            ParentRef::Project(_) => "SELECT EXISTS(SELECT 1 FROM projects WHERE id = $1)",
            ParentRef::Board(_) => "SELECT EXISTS(SELECT 1 FROM boards WHERE id = $1)",
            ParentRef::Column(_) => "SELECT EXISTS(SELECT 1 FROM columns WHERE id = $1)",
        };
        let exists = sqlx::query_scalar::<_, bool>(sql)
            .bind(parent.id())
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn natural_key_taken(&self, key: NaturalKey<'_>) -> Result<bool, AppError> {
        let query = match key {
            NaturalKey::UserEmail(email) => {
                sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                    .bind(email.to_string())
            }
            NaturalKey::ProjectName(name) => {
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM projects WHERE name = $1)")
                    .bind(name.to_string())
            }
            NaturalKey::BoardName(name) => {
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM boards WHERE name = $1)")
                    .bind(name.to_string())
            }
            NaturalKey::ColumnStatus(status) => {
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM columns WHERE status = $1)")
                    .bind(status.to_string())
            }
            NaturalKey::TaskTitle(title) => {
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tasks WHERE title = $1)")
                    .bind(title.to_string())
            }
            NaturalKey::Membership {
                project_id,
                user_id,
            } => sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM project_users WHERE project_id = $1 AND user_id = $2)",
            )
            .bind(project_id)
            .bind(user_id),
        };
        Ok(query.fetch_one(&self.pool).await?)
    }

    async fn insert_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, password) VALUES ($1, $2, $3)
             RETURNING id, username, email",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserCredentials>, AppError> {
        let user = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, username, email, password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_project_with_owner(
        &self,
        project: &NewProject,
        owner_role: &str,
    ) -> Result<Project, AppError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Project>(&format!(
            "INSERT INTO projects (name, user_id, description) VALUES ($1, $2, $3)
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(&project.name)
        .bind(project.user_id)
        .bind(&project.description)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO project_users (project_id, user_id, role) VALUES ($1, $2, $3)")
            .bind(created.id)
            .bind(created.user_id)
            .bind(owner_role)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn get_project(&self, id: i32) -> Result<Option<Project>, AppError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(project)
    }

    async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(projects)
    }

    async fn update_project(
        &self,
        id: i32,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        if let Some(name) = name {
            sqlx::query("UPDATE projects SET name = $1 WHERE id = $2")
                .bind(name)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        if let Some(description) = description {
            sqlx::query("UPDATE projects SET description = $1 WHERE id = $2")
                .bind(description)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn delete_project(&self, id: i32) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn insert_board_with_columns(
        &self,
        board: &NewBoard,
        statuses: &[&str],
    ) -> Result<BoardWithColumns, AppError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Board>(
            "INSERT INTO boards (project_id, name) VALUES ($1, $2) RETURNING id, project_id, name",
        )
        .bind(board.project_id)
        .bind(&board.name)
        .fetch_one(&mut *tx)
        .await?;

        let mut columns = Vec::with_capacity(statuses.len());
        for status in statuses {
            let column = sqlx::query_as::<_, Column>(
                "INSERT INTO columns (board_id, status) VALUES ($1, $2)
                 RETURNING id, board_id, status",
            )
            .bind(created.id)
            .bind(*status)
            .fetch_one(&mut *tx)
            .await?;
            columns.push(column);
        }

        tx.commit().await?;
        Ok(BoardWithColumns {
            board: created,
            columns,
        })
    }

    async fn get_board(&self, id: i32) -> Result<Option<Board>, AppError> {
        let board =
            sqlx::query_as::<_, Board>("SELECT id, project_id, name FROM boards WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(board)
    }

    async fn list_boards(&self) -> Result<Vec<Board>, AppError> {
        let boards =
            sqlx::query_as::<_, Board>("SELECT id, project_id, name FROM boards ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(boards)
    }

    async fn list_boards_by_project(&self, project_id: i32) -> Result<Vec<Board>, AppError> {
        let boards = sqlx::query_as::<_, Board>(
            "SELECT id, project_id, name FROM boards WHERE project_id = $1 ORDER BY id",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(boards)
    }

    async fn rename_board(&self, id: i32, name: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE boards SET name = $1 WHERE id = $2")
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_board(&self, id: i32) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM boards WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn insert_column(&self, column: &NewColumn) -> Result<Column, AppError> {
        let created = sqlx::query_as::<_, Column>(
            "INSERT INTO columns (board_id, status) VALUES ($1, $2) RETURNING id, board_id, status",
        )
        .bind(column.board_id)
        .bind(&column.status)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn get_column(&self, id: i32) -> Result<Option<Column>, AppError> {
        let column =
            sqlx::query_as::<_, Column>("SELECT id, board_id, status FROM columns WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(column)
    }

    async fn list_columns(&self) -> Result<Vec<Column>, AppError> {
        let columns =
            sqlx::query_as::<_, Column>("SELECT id, board_id, status FROM columns ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(columns)
    }

    async fn list_columns_by_board(&self, board_id: i32) -> Result<Vec<Column>, AppError> {
        let columns = sqlx::query_as::<_, Column>(
            "SELECT id, board_id, status FROM columns WHERE board_id = $1 ORDER BY id",
        )
        .bind(board_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(columns)
    }

    async fn set_column_status(&self, id: i32, status: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE columns SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_column(&self, id: i32) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM columns WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn insert_task_with_log(
        &self,
        task: &NewTask,
        log: &NewTaskLog,
    ) -> Result<Task, AppError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (column_id, title, description, created_at) VALUES ($1, $2, $3, $4)
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(task.column_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(log.created_at)
        .fetch_one(&mut *tx)
        .await?;

        append_log(&mut tx, created.id, log).await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn get_task(&self, id: i32) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    async fn list_tasks_by_column(&self, column_id: i32) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE column_id = $1 ORDER BY id"
        ))
        .bind(column_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    async fn update_task_with_log(
        &self,
        id: i32,
        title: Option<&str>,
        description: Option<&str>,
        log: &NewTaskLog,
    ) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;

        let locked = sqlx::query_scalar::<_, i32>("SELECT id FROM tasks WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            tx.rollback().await?;
            return Ok(0);
        }

        if let Some(title) = title {
            sqlx::query("UPDATE tasks SET title = $1 WHERE id = $2")
                .bind(title)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        if let Some(description) = description {
            sqlx::query("UPDATE tasks SET description = $1 WHERE id = $2")
                .bind(description)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        append_log(&mut tx, id, log).await?;
        tx.commit().await?;
        Ok(1)
    }

    async fn delete_task_with_log(&self, id: i32, log: &NewTaskLog) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            tx.rollback().await?;
            return Ok(0);
        }

        append_log(&mut tx, id, log).await?;
        tx.commit().await?;
        Ok(deleted)
    }

    async fn list_task_logs(&self, task_id: i32) -> Result<Vec<TaskLog>, AppError> {
        let logs = sqlx::query_as::<_, TaskLog>(
            "SELECT id, task_id, action_type, log_message, created_at
             FROM task_logs WHERE task_id = $1 ORDER BY created_at, id",
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(logs)
    }

    async fn insert_member(&self, member: &ProjectMember) -> Result<(), AppError> {
        sqlx::query("INSERT INTO project_users (project_id, user_id, role) VALUES ($1, $2, $3)")
            .bind(member.project_id)
            .bind(member.user_id)
            .bind(&member.role)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_member(&self, project_id: i32, user_id: i32) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM project_users WHERE project_id = $1 AND user_id = $2")
            .bind(project_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn list_members(&self, project_id: i32) -> Result<Vec<ProjectMemberInfo>, AppError> {
        let members = sqlx::query_as::<_, ProjectMemberInfo>(
            "SELECT users.id AS user_id, users.username, users.email, project_users.role
             FROM project_users
             JOIN users ON project_users.user_id = users.id
             WHERE project_users.project_id = $1
             ORDER BY users.id",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }
}

async fn append_log(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    task_id: i32,
    log: &NewTaskLog,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO task_logs (task_id, action_type, log_message, created_at)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(task_id)
    .bind(log.action.as_str())
    .bind(&log.log_message)
    .bind(log.created_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
