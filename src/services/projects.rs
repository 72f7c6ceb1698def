use std::sync::Arc;

use crate::config::PatchSemantics;
use crate::error::AppError;
use crate::integrity::{self, Proposal};
use crate::models::{Board, Confirmation, NewProject, Project, ProjectPatch, OWNER_ROLE};
use crate::store::{NaturalKey, ParentRef, Store};

#[derive(Clone)]
pub struct ProjectService {
    store: Arc<dyn Store>,
    patch: PatchSemantics,
}

impl ProjectService {
    pub fn new(store: Arc<dyn Store>, patch: PatchSemantics) -> Self {
        Self { store, patch }
    }

    /// Creates the project and makes its owner a member with role `"user"`.
    pub async fn create_project(&self, input: NewProject) -> Result<Project, AppError> {
        let proposal = Proposal::new()
            .require_id("user_id", input.user_id)
            .payload(&input)
            .parent(ParentRef::User(input.user_id))
            .unique(NaturalKey::ProjectName(&input.name));
        integrity::enforce(self.store.as_ref(), &proposal).await?;

        let project = self
            .store
            .insert_project_with_owner(&input, OWNER_ROLE)
            .await?;
        log::info!("project {} created by user {}", project.id, project.user_id);
        Ok(project)
    }

    pub async fn get_project(&self, id: i32) -> Result<Project, AppError> {
        self.store
            .get_project(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".into()))
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        self.store.list_projects().await
    }

    /// Applies the fields of `patch` that [`PatchSemantics`] selects and returns the result.
    pub async fn update_project(&self, id: i32, patch: ProjectPatch) -> Result<Project, AppError> {
        let mut project = self.get_project(id).await?;

        let name = self.patch.pick(patch.name.as_deref());
        let description = self.patch.pick(patch.description.as_deref());
        if name.is_none() && description.is_none() {
            return Ok(project);
        }

        self.store.update_project(id, name, description).await?;
        if let Some(name) = name {
            project.name = name.to_string();
        }
        if let Some(description) = description {
            project.description = description.to_string();
        }
        Ok(project)
    }

    pub async fn delete_project(&self, id: i32) -> Result<Confirmation, AppError> {
        if self.store.delete_project(id).await? == 0 {
            return Err(AppError::NotFound("Project not found".into()));
        }
        log::info!("project {} deleted", id);
        Ok(Confirmation::new("Project deleted successfully"))
    }

    pub async fn list_project_boards(&self, id: i32) -> Result<Vec<Board>, AppError> {
        self.get_project(id).await?;
        self.store.list_boards_by_project(id).await
    }
}
