use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{NaturalKey, ParentRef, Store};
use crate::error::AppError;
use crate::models::{
    Board, BoardWithColumns, Column, NewBoard, NewColumn, NewProject, NewTask, NewTaskLog,
    Project, ProjectMember, ProjectMemberInfo, Task, TaskLog, User, UserCredentials,
};

#[derive(Default)]
struct Sequences {
    user: i32,
    project: i32,
    board: i32,
    column: i32,
    task: i32,
    task_log: i32,
}

fn next(seq: &mut i32) -> i32 {
    *seq += 1;
    *seq
}

#[derive(Default)]
struct Tables {
    seq: Sequences,
    users: BTreeMap<i32, UserCredentials>,
    projects: BTreeMap<i32, Project>,
    members: BTreeMap<(i32, i32), String>,
    boards: BTreeMap<i32, Board>,
    columns: BTreeMap<i32, Column>,
    tasks: BTreeMap<i32, Task>,
    task_logs: Vec<TaskLog>,
}

fn unique_violation(what: &str) -> AppError {
    AppError::Conflict(format!("{} already exists", what))
}

fn foreign_key_violation(table: &str, id: i32) -> AppError {
    AppError::DatabaseError(format!("foreign key violation: {} {} does not exist", table, id))
}

impl Tables {
    fn remove_tasks_where<F: Fn(&Task) -> bool>(&mut self, pred: F) {
        self.tasks.retain(|_, task| !pred(task));
    }

    fn remove_columns_where<F: Fn(&Column) -> bool>(&mut self, pred: F) {
        let doomed: Vec<i32> = self
            .columns
            .values()
            .filter(|c| pred(c))
            .map(|c| c.id)
            .collect();
        self.columns.retain(|id, _| !doomed.contains(id));
        self.remove_tasks_where(|t| doomed.contains(&t.column_id));
    }

    fn remove_boards_where<F: Fn(&Board) -> bool>(&mut self, pred: F) {
        let doomed: Vec<i32> = self
            .boards
            .values()
            .filter(|b| pred(b))
            .map(|b| b.id)
            .collect();
        self.boards.retain(|id, _| !doomed.contains(id));
        self.remove_columns_where(|c| doomed.contains(&c.board_id));
    }

    fn push_log(&mut self, task_id: i32, log: &NewTaskLog) {
        let id = next(&mut self.seq.task_log);
        self.task_logs.push(TaskLog {
            id,
            task_id,
            action_type: log.action.as_str().to_string(),
            log_message: log.log_message.clone(),
            created_at: log.created_at,
        });
    }
}

/// In-process [`Store`] with the same constraints and cascades as the SQL schema.
///
/// All tables sit behind one `RwLock`; a composite write holds the write guard for its whole
/// duration, which gives it the same all-or-nothing visibility as a transaction.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn parent_exists(&self, parent: ParentRef) -> Result<bool, AppError> {
        let t = self.tables.read().await;
        let id = parent.id();
        Ok(match parent {
            ParentRef::User(_) => t.users.contains_key(&id),
            ParentRef::Project(_) => t.projects.contains_key(&id),
            ParentRef::Board(_) => t.boards.contains_key(&id),
            ParentRef::Column(_) => t.columns.contains_key(&id),
        })
    }

    async fn natural_key_taken(&self, key: NaturalKey<'_>) -> Result<bool, AppError> {
        let t = self.tables.read().await;
        Ok(match key {
            NaturalKey::UserEmail(email) => t.users.values().any(|u| u.email == email),
            NaturalKey::ProjectName(name) => t.projects.values().any(|p| p.name == name),
            NaturalKey::BoardName(name) => t.boards.values().any(|b| b.name == name),
            NaturalKey::ColumnStatus(status) => t.columns.values().any(|c| c.status == status),
            NaturalKey::TaskTitle(title) => t.tasks.values().any(|task| task.title == title),
            NaturalKey::Membership {
                project_id,
                user_id,
            } => t.members.contains_key(&(project_id, user_id)),
        })
    }

    async fn insert_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let mut t = self.tables.write().await;
        if t.users.values().any(|u| u.email == email) {
            return Err(unique_violation("users.email"));
        }
        let id = next(&mut t.seq.user);
        let creds = UserCredentials {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password: password_hash.to_string(),
        };
        t.users.insert(id, creds.clone());
        Ok(creds.into())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserCredentials>, AppError> {
        let t = self.tables.read().await;
        Ok(t.users.values().find(|u| u.email == email).cloned())
    }

    async fn insert_project_with_owner(
        &self,
        project: &NewProject,
        owner_role: &str,
    ) -> Result<Project, AppError> {
        let mut t = self.tables.write().await;
        if !t.users.contains_key(&project.user_id) {
            return Err(foreign_key_violation("users", project.user_id));
        }
        if t.projects.values().any(|p| p.name == project.name) {
            return Err(unique_violation("projects.name"));
        }
        let id = next(&mut t.seq.project);
        let created = Project {
            id,
            user_id: project.user_id,
            name: project.name.clone(),
            description: project.description.clone(),
            created_at: Utc::now(),
        };
        t.projects.insert(id, created.clone());
        t.members
            .insert((id, project.user_id), owner_role.to_string());
        Ok(created)
    }

    async fn get_project(&self, id: i32) -> Result<Option<Project>, AppError> {
        Ok(self.tables.read().await.projects.get(&id).cloned())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        Ok(self.tables.read().await.projects.values().cloned().collect())
    }

    async fn update_project(
        &self,
        id: i32,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<(), AppError> {
        let mut t = self.tables.write().await;
        if let Some(name) = name {
            if t.projects.values().any(|p| p.id != id && p.name == name) {
                return Err(unique_violation("projects.name"));
            }
        }
        if let Some(project) = t.projects.get_mut(&id) {
            if let Some(name) = name {
                project.name = name.to_string();
            }
            if let Some(description) = description {
                project.description = description.to_string();
            }
        }
        Ok(())
    }

    async fn delete_project(&self, id: i32) -> Result<u64, AppError> {
        let mut t = self.tables.write().await;
        if t.projects.remove(&id).is_none() {
            return Ok(0);
        }
        t.members.retain(|(project_id, _), _| *project_id != id);
        t.remove_boards_where(|b| b.project_id == id);
        Ok(1)
    }

    async fn insert_board_with_columns(
        &self,
        board: &NewBoard,
        statuses: &[&str],
    ) -> Result<BoardWithColumns, AppError> {
        let mut t = self.tables.write().await;
        if !t.projects.contains_key(&board.project_id) {
            return Err(foreign_key_violation("projects", board.project_id));
        }
        if t.boards.values().any(|b| b.name == board.name) {
            return Err(unique_violation("boards.name"));
        }
        let id = next(&mut t.seq.board);
        let created = Board {
            id,
            project_id: board.project_id,
            name: board.name.clone(),
        };
        t.boards.insert(id, created.clone());

        let mut columns = Vec::with_capacity(statuses.len());
        for status in statuses {
            let column = Column {
                id: next(&mut t.seq.column),
                board_id: id,
                status: status.to_string(),
            };
            t.columns.insert(column.id, column.clone());
            columns.push(column);
        }

        Ok(BoardWithColumns {
            board: created,
            columns,
        })
    }

    async fn get_board(&self, id: i32) -> Result<Option<Board>, AppError> {
        Ok(self.tables.read().await.boards.get(&id).cloned())
    }

    async fn list_boards(&self) -> Result<Vec<Board>, AppError> {
        Ok(self.tables.read().await.boards.values().cloned().collect())
    }

    async fn list_boards_by_project(&self, project_id: i32) -> Result<Vec<Board>, AppError> {
        let t = self.tables.read().await;
        Ok(t.boards
            .values()
            .filter(|b| b.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn rename_board(&self, id: i32, name: &str) -> Result<(), AppError> {
        let mut t = self.tables.write().await;
        if t.boards.values().any(|b| b.id != id && b.name == name) {
            return Err(unique_violation("boards.name"));
        }
        if let Some(board) = t.boards.get_mut(&id) {
            board.name = name.to_string();
        }
        Ok(())
    }

    async fn delete_board(&self, id: i32) -> Result<u64, AppError> {
        let mut t = self.tables.write().await;
        if !t.boards.contains_key(&id) {
            return Ok(0);
        }
        t.remove_boards_where(|b| b.id == id);
        Ok(1)
    }

    async fn insert_column(&self, column: &NewColumn) -> Result<Column, AppError> {
        let mut t = self.tables.write().await;
        if !t.boards.contains_key(&column.board_id) {
            return Err(foreign_key_violation("boards", column.board_id));
        }
        let created = Column {
            id: next(&mut t.seq.column),
            board_id: column.board_id,
            status: column.status.clone(),
        };
        t.columns.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_column(&self, id: i32) -> Result<Option<Column>, AppError> {
        Ok(self.tables.read().await.columns.get(&id).cloned())
    }

    async fn list_columns(&self) -> Result<Vec<Column>, AppError> {
        Ok(self.tables.read().await.columns.values().cloned().collect())
    }

    async fn list_columns_by_board(&self, board_id: i32) -> Result<Vec<Column>, AppError> {
        let t = self.tables.read().await;
        Ok(t.columns
            .values()
            .filter(|c| c.board_id == board_id)
            .cloned()
            .collect())
    }

    async fn set_column_status(&self, id: i32, status: &str) -> Result<(), AppError> {
        let mut t = self.tables.write().await;
        if let Some(column) = t.columns.get_mut(&id) {
            column.status = status.to_string();
        }
        Ok(())
    }

    async fn delete_column(&self, id: i32) -> Result<u64, AppError> {
        let mut t = self.tables.write().await;
        if !t.columns.contains_key(&id) {
            return Ok(0);
        }
        t.remove_columns_where(|c| c.id == id);
        Ok(1)
    }

    async fn insert_task_with_log(
        &self,
        task: &NewTask,
        log: &NewTaskLog,
    ) -> Result<Task, AppError> {
        let mut t = self.tables.write().await;
        if !t.columns.contains_key(&task.column_id) {
            return Err(foreign_key_violation("columns", task.column_id));
        }
        if t.tasks.values().any(|existing| existing.title == task.title) {
            return Err(unique_violation("tasks.title"));
        }
        let created = Task {
            id: next(&mut t.seq.task),
            column_id: task.column_id,
            title: task.title.clone(),
            description: task.description.clone(),
            created_at: log.created_at,
        };
        t.tasks.insert(created.id, created.clone());
        t.push_log(created.id, log);
        Ok(created)
    }

    async fn get_task(&self, id: i32) -> Result<Option<Task>, AppError> {
        Ok(self.tables.read().await.tasks.get(&id).cloned())
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
        Ok(self.tables.read().await.tasks.values().cloned().collect())
    }

    async fn list_tasks_by_column(&self, column_id: i32) -> Result<Vec<Task>, AppError> {
        let t = self.tables.read().await;
        Ok(t.tasks
            .values()
            .filter(|task| task.column_id == column_id)
            .cloned()
            .collect())
    }

    async fn update_task_with_log(
        &self,
        id: i32,
        title: Option<&str>,
        description: Option<&str>,
        log: &NewTaskLog,
    ) -> Result<u64, AppError> {
        let mut t = self.tables.write().await;
        if !t.tasks.contains_key(&id) {
            return Ok(0);
        }
        if let Some(title) = title {
            if t.tasks.values().any(|task| task.id != id && task.title == title) {
                return Err(unique_violation("tasks.title"));
            }
        }
        if let Some(task) = t.tasks.get_mut(&id) {
            if let Some(title) = title {
                task.title = title.to_string();
            }
            if let Some(description) = description {
                task.description = description.to_string();
            }
        }
        t.push_log(id, log);
        Ok(1)
    }

    async fn delete_task_with_log(&self, id: i32, log: &NewTaskLog) -> Result<u64, AppError> {
        let mut t = self.tables.write().await;
        if t.tasks.remove(&id).is_none() {
            return Ok(0);
        }
        t.push_log(id, log);
        Ok(1)
    }

    async fn list_task_logs(&self, task_id: i32) -> Result<Vec<TaskLog>, AppError> {
        let t = self.tables.read().await;
        let mut logs: Vec<TaskLog> = t
            .task_logs
            .iter()
            .filter(|log| log.task_id == task_id)
            .cloned()
            .collect();
        logs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(logs)
    }

    async fn insert_member(&self, member: &ProjectMember) -> Result<(), AppError> {
        let mut t = self.tables.write().await;
        if !t.projects.contains_key(&member.project_id) {
            return Err(foreign_key_violation("projects", member.project_id));
        }
        if !t.users.contains_key(&member.user_id) {
            return Err(foreign_key_violation("users", member.user_id));
        }
        let key = (member.project_id, member.user_id);
        if t.members.contains_key(&key) {
            return Err(unique_violation("project_users"));
        }
        t.members.insert(key, member.role.clone());
        Ok(())
    }

    async fn delete_member(&self, project_id: i32, user_id: i32) -> Result<u64, AppError> {
        let mut t = self.tables.write().await;
        Ok(t.members.remove(&(project_id, user_id)).map_or(0, |_| 1))
    }

    async fn list_members(&self, project_id: i32) -> Result<Vec<ProjectMemberInfo>, AppError> {
        let t = self.tables.read().await;
        Ok(t.members
            .iter()
            .filter(|((pid, _), _)| *pid == project_id)
            .filter_map(|((_, user_id), role)| {
                t.users.get(user_id).map(|user| ProjectMemberInfo {
                    user_id: user.id,
                    username: user.username.clone(),
                    email: user.email.clone(),
                    role: role.clone(),
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskAction;

    fn entry(action: TaskAction) -> NewTaskLog {
        NewTaskLog {
            action,
            log_message: format!("{} entry", action),
            created_at: Utc::now(),
        }
    }

    async fn seeded() -> (MemoryStore, Project, BoardWithColumns) {
        let store = MemoryStore::new();
        let user = store.insert_user("ann", "ann@example.com", "hash").await.unwrap();
        let project = store
            .insert_project_with_owner(
                &NewProject {
                    user_id: user.id,
                    name: "Apollo".into(),
                    description: String::new(),
                },
                "user",
            )
            .await
            .unwrap();
        let board = store
            .insert_board_with_columns(
                &NewBoard {
                    project_id: project.id,
                    name: "Sprint".into(),
                },
                &["todo", "doing", "done"],
            )
            .await
            .unwrap();
        (store, project, board)
    }

    #[actix_rt::test]
    async fn test_enforces_schema_constraints() {
        let (store, project, _) = seeded().await;

        let dup_email = store.insert_user("ann2", "ann@example.com", "hash").await;
        assert!(matches!(dup_email, Err(AppError::Conflict(_))));

        let orphan = store
            .insert_board_with_columns(
                &NewBoard {
                    project_id: project.id + 100,
                    name: "Orphan".into(),
                },
                &["todo"],
            )
            .await;
        assert!(matches!(orphan, Err(AppError::DatabaseError(_))));
    }

    #[actix_rt::test]
    async fn test_delete_project_cascades_but_keeps_logs() {
        let (store, project, board) = seeded().await;
        let task = store
            .insert_task_with_log(
                &NewTask {
                    column_id: board.columns[0].id,
                    title: "Cascade me".into(),
                    description: String::new(),
                },
                &entry(TaskAction::Create),
            )
            .await
            .unwrap();

        assert_eq!(store.delete_project(project.id).await.unwrap(), 1);

        assert!(store.get_board(board.board.id).await.unwrap().is_none());
        assert!(store.list_columns().await.unwrap().is_empty());
        assert!(store.get_task(task.id).await.unwrap().is_none());
        assert!(store.list_members(project.id).await.unwrap().is_empty());
        assert_eq!(store.list_task_logs(task.id).await.unwrap().len(), 1);
        assert_eq!(store.delete_project(project.id).await.unwrap(), 0);
    }

    #[actix_rt::test]
    async fn test_update_vanished_task_writes_no_log() {
        let (store, _, board) = seeded().await;
        let task = store
            .insert_task_with_log(
                &NewTask {
                    column_id: board.columns[0].id,
                    title: "Short lived".into(),
                    description: String::new(),
                },
                &entry(TaskAction::Create),
            )
            .await
            .unwrap();
        store
            .delete_task_with_log(task.id, &entry(TaskAction::Delete))
            .await
            .unwrap();

        let updated = store
            .update_task_with_log(task.id, Some("Revived"), None, &entry(TaskAction::Update))
            .await
            .unwrap();
        assert_eq!(updated, 0);

        let actions: Vec<String> = store
            .list_task_logs(task.id)
            .await
            .unwrap()
            .into_iter()
            .map(|log| log.action_type)
            .collect();
        assert_eq!(actions, vec!["create".to_string(), "delete".to_string()]);
    }

    #[actix_rt::test]
    async fn test_delete_missing_task_writes_no_log() {
        let (store, _, _) = seeded().await;
        let removed = store
            .delete_task_with_log(42, &entry(TaskAction::Delete))
            .await
            .unwrap();
        assert_eq!(removed, 0);
        assert!(store.list_task_logs(42).await.unwrap().is_empty());
    }
}
