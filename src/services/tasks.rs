use std::sync::Arc;

use chrono::Utc;

use crate::audit;
use crate::config::PatchSemantics;
use crate::error::AppError;
use crate::integrity::{self, Proposal};
use crate::models::{Confirmation, NewTask, Task, TaskAction, TaskLog, TaskPatch};
use crate::store::{NaturalKey, ParentRef, Store};

/// Task operations. Every mutation carries its audit entry into the same store write.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn Store>,
    patch: PatchSemantics,
}

impl TaskService {
    pub fn new(store: Arc<dyn Store>, patch: PatchSemantics) -> Self {
        Self { store, patch }
    }

    pub async fn create_task(&self, input: NewTask) -> Result<Task, AppError> {
        let proposal = Proposal::new()
            .require_id("column_id", input.column_id)
            .payload(&input)
            .parent(ParentRef::Column(input.column_id))
            .unique(NaturalKey::TaskTitle(&input.title));
        integrity::enforce(self.store.as_ref(), &proposal).await?;

        let entry = audit::entry_at(TaskAction::Create, Utc::now());
        let task = self.store.insert_task_with_log(&input, &entry).await?;
        log::info!("task {} created in column {}", task.id, task.column_id);
        Ok(task)
    }

    pub async fn get_task(&self, id: i32) -> Result<Task, AppError> {
        self.store
            .get_task(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
        self.store.list_tasks().await
    }

    pub async fn list_tasks_by_column(&self, column_id: i32) -> Result<Vec<Task>, AppError> {
        if !self.store.parent_exists(ParentRef::Column(column_id)).await? {
            return Err(AppError::NotFound("Column not found".into()));
        }
        self.store.list_tasks_by_column(column_id).await
    }

    /// Updates title and/or description and records one `update` entry, even when the patch
    /// selects no field.
    pub async fn update_task(&self, id: i32, patch: TaskPatch) -> Result<Task, AppError> {
        let mut task = self.get_task(id).await?;

        let title = self.patch.pick(patch.title.as_deref());
        let description = self.patch.pick(patch.description.as_deref());

        let updated = self
            .store
            .update_task_with_log(id, title, description, &audit::entry(TaskAction::Update))
            .await?;
        if updated == 0 {
            return Err(AppError::NotFound("Task not found".into()));
        }

        if let Some(title) = title {
            task.title = title.to_string();
        }
        if let Some(description) = description {
            task.description = description.to_string();
        }
        Ok(task)
    }

    pub async fn delete_task(&self, id: i32) -> Result<Confirmation, AppError> {
        let removed = self
            .store
            .delete_task_with_log(id, &audit::entry(TaskAction::Delete))
            .await?;
        if removed == 0 {
            return Err(AppError::NotFound("Task not found".into()));
        }
        log::info!("task {} deleted", id);
        Ok(Confirmation::new("Task deleted successfully"))
    }

    /// The audit trail of a task, oldest first. Deleted tasks keep their trail.
    pub async fn list_task_logs(&self, task_id: i32) -> Result<Vec<TaskLog>, AppError> {
        self.store.list_task_logs(task_id).await
    }
}
