use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{BoardPatch, NewBoard},
    services::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use validator::Validate;

#[get("")]
pub async fn list_boards(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let boards = state.boards.list_boards().await?;
    Ok(HttpResponse::Ok().json(boards))
}

/// Creates a board in a project.
///
/// The response contains the board and its three default columns (`todo`, `doing`, `done`).
///
/// ## Responses:
/// - `201 Created`: board with `columns`.
/// - `400 Bad Request`: `project_id` missing or zero.
/// - `404 Not Found`: the project does not exist.
/// - `409 Conflict`: a board with this name exists in any project.
#[post("")]
pub async fn create_board(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    board_data: web::Json<NewBoard>,
) -> Result<impl Responder, AppError> {
    log::debug!("{} creates board {:?}", user.email(), board_data.name);

    let board = state.boards.create_board(board_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(board))
}

#[get("/{id}")]
pub async fn get_board(
    state: web::Data<AppState>,
    board_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let board = state.boards.get_board(board_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(board))
}

#[put("/{id}")]
pub async fn update_board(
    state: web::Data<AppState>,
    board_id: web::Path<i32>,
    patch: web::Json<BoardPatch>,
) -> Result<impl Responder, AppError> {
    patch.validate()?;
    let board = state
        .boards
        .update_board(board_id.into_inner(), patch.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(board))
}

#[delete("/{id}")]
pub async fn delete_board(
    state: web::Data<AppState>,
    board_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let confirmation = state.boards.delete_board(board_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(confirmation))
}

#[get("/{id}/columns")]
pub async fn list_board_columns(
    state: web::Data<AppState>,
    board_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let columns = state.boards.list_board_columns(board_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(columns))
}
