use std::sync::Arc;

use crate::error::AppError;
use crate::integrity::{self, Proposal};
use crate::models::{Confirmation, NewMember, ProjectMember, ProjectMemberInfo};
use crate::store::{NaturalKey, ParentRef, Store};

#[derive(Clone)]
pub struct MemberService {
    store: Arc<dyn Store>,
}

impl MemberService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Binds `input.user_id` to the project with the given free-form role.
    pub async fn add_member(
        &self,
        project_id: i32,
        input: NewMember,
    ) -> Result<Confirmation, AppError> {
        let proposal = Proposal::new()
            .require_id("project_id", project_id)
            .require_id("user_id", input.user_id)
            .require_text("role", &input.role)
            .payload(&input)
            .parent(ParentRef::Project(project_id))
            .parent(ParentRef::User(input.user_id))
            .unique(NaturalKey::Membership {
                project_id,
                user_id: input.user_id,
            });
        integrity::enforce(self.store.as_ref(), &proposal).await?;

        self.store
            .insert_member(&ProjectMember {
                project_id,
                user_id: input.user_id,
                role: input.role,
            })
            .await?;
        log::info!("user {} added to project {}", input.user_id, project_id);
        Ok(Confirmation::new("User added to project successfully"))
    }

    pub async fn remove_member(
        &self,
        project_id: i32,
        user_id: i32,
    ) -> Result<Confirmation, AppError> {
        if user_id == 0 {
            return Err(AppError::BadRequest("user_id is required".into()));
        }
        let pair = NaturalKey::Membership {
            project_id,
            user_id,
        };
        if !self.store.natural_key_taken(pair).await? {
            return Err(AppError::NotFound("User is not in the project".into()));
        }
        self.store.delete_member(project_id, user_id).await?;
        log::info!("user {} removed from project {}", user_id, project_id);
        Ok(Confirmation::new("User removed from project successfully"))
    }

    pub async fn list_members(&self, project_id: i32) -> Result<Vec<ProjectMemberInfo>, AppError> {
        self.store.list_members(project_id).await
    }
}
