use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Column {
    pub id: i32,
    pub board_id: i32,
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewColumn {
    #[serde(default)]
    pub board_id: i32,
    #[serde(default)]
    #[validate(length(max = 64))]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ColumnPatch {
    #[validate(length(max = 64))]
    pub status: String,
}
