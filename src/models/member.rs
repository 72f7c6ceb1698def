use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Role given to the creator of a project.
pub const OWNER_ROLE: &str = "user";

/// A row of `project_users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProjectMember {
    pub project_id: i32,
    pub user_id: i32,
    pub role: String,
}

/// One entry of a project's member listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProjectMemberInfo {
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewMember {
    #[serde(default)]
    pub user_id: i32,
    #[serde(default)]
    #[validate(length(max = 64))]
    pub role: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberRemoval {
    #[serde(default)]
    pub user_id: i32,
}
