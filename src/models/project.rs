use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A project owned by a user. Boards hang off it by `project_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub description: String,
    /// Assigned by the server at creation.
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a project.
///
/// Absent fields deserialize to their zero value; a zero `user_id` is rejected by the
/// integrity validator as a missing required field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewProject {
    #[serde(default)]
    pub user_id: i32,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Partial update of a project. How an empty string is treated depends on
/// [`PatchSemantics`](crate::config::PatchSemantics).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProjectPatch {
    #[validate(length(max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
}
