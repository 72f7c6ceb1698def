use std::sync::Arc;

use crate::error::AppError;
use crate::integrity::{self, Proposal};
use crate::models::{
    Board, BoardPatch, BoardWithColumns, Column, Confirmation, NewBoard, DEFAULT_COLUMN_STATUSES,
};
use crate::store::{NaturalKey, ParentRef, Store};

#[derive(Clone)]
pub struct BoardService {
    store: Arc<dyn Store>,
}

impl BoardService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Creates the board together with its `todo`, `doing` and `done` columns.
    pub async fn create_board(&self, input: NewBoard) -> Result<BoardWithColumns, AppError> {
        let proposal = Proposal::new()
            .require_id("project_id", input.project_id)
            .payload(&input)
            .parent(ParentRef::Project(input.project_id))
            .unique(NaturalKey::BoardName(&input.name));
        integrity::enforce(self.store.as_ref(), &proposal).await?;

        let created = self
            .store
            .insert_board_with_columns(&input, &DEFAULT_COLUMN_STATUSES)
            .await?;
        log::info!(
            "board {} created in project {} with {} columns",
            created.board.id,
            created.board.project_id,
            created.columns.len()
        );
        Ok(created)
    }

    pub async fn get_board(&self, id: i32) -> Result<Board, AppError> {
        self.store
            .get_board(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Board not found".into()))
    }

    pub async fn list_boards(&self) -> Result<Vec<Board>, AppError> {
        self.store.list_boards().await
    }

    pub async fn update_board(&self, id: i32, patch: BoardPatch) -> Result<Board, AppError> {
        let mut board = self.get_board(id).await?;
        self.store.rename_board(id, &patch.name).await?;
        board.name = patch.name;
        Ok(board)
    }

    pub async fn delete_board(&self, id: i32) -> Result<Confirmation, AppError> {
        if self.store.delete_board(id).await? == 0 {
            return Err(AppError::NotFound("Board not found".into()));
        }
        log::info!("board {} deleted", id);
        Ok(Confirmation::new("Board deleted successfully"))
    }

    pub async fn list_board_columns(&self, id: i32) -> Result<Vec<Column>, AppError> {
        self.get_board(id).await?;
        self.store.list_columns_by_board(id).await
    }
}
