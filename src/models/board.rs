use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::Column;

/// Statuses of the columns every new board starts with, in display order.
pub const DEFAULT_COLUMN_STATUSES: [&str; 3] = ["todo", "doing", "done"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Board {
    pub id: i32,
    pub project_id: i32,
    pub name: String,
}

/// A board together with its columns, as returned by board creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardWithColumns {
    #[serde(flatten)]
    pub board: Board,
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewBoard {
    #[serde(default)]
    pub project_id: i32,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub name: String,
}

/// Board updates replace the name unconditionally.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BoardPatch {
    #[validate(length(max = 255))]
    pub name: String,
}
