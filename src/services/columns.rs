use std::sync::Arc;

use crate::error::AppError;
use crate::integrity::{self, Proposal};
use crate::models::{Column, ColumnPatch, Confirmation, NewColumn};
use crate::store::{NaturalKey, ParentRef, Store};

#[derive(Clone)]
pub struct ColumnService {
    store: Arc<dyn Store>,
}

impl ColumnService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Adds a column to a board. The status must not be used by any column of any board.
    pub async fn create_column(&self, input: NewColumn) -> Result<Column, AppError> {
        let proposal = Proposal::new()
            .require_id("board_id", input.board_id)
            .payload(&input)
            .parent(ParentRef::Board(input.board_id))
            .unique(NaturalKey::ColumnStatus(&input.status));
        integrity::enforce(self.store.as_ref(), &proposal).await?;

        let column = self.store.insert_column(&input).await?;
        log::info!("column {} created on board {}", column.id, column.board_id);
        Ok(column)
    }

    pub async fn get_column(&self, id: i32) -> Result<Column, AppError> {
        self.store
            .get_column(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Column not found".into()))
    }

    pub async fn list_columns(&self) -> Result<Vec<Column>, AppError> {
        self.store.list_columns().await
    }

    pub async fn update_column(&self, id: i32, patch: ColumnPatch) -> Result<Column, AppError> {
        let mut column = self.get_column(id).await?;
        self.store.set_column_status(id, &patch.status).await?;
        column.status = patch.status;
        Ok(column)
    }

    pub async fn delete_column(&self, id: i32) -> Result<Confirmation, AppError> {
        if self.store.delete_column(id).await? == 0 {
            return Err(AppError::NotFound("Column not found".into()));
        }
        log::info!("column {} deleted", id);
        Ok(Confirmation::new("Column deleted successfully"))
    }
}
