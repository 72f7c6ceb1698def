use crate::{
    error::AppError,
    models::{ColumnPatch, NewColumn},
    services::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use validator::Validate;

#[get("")]
pub async fn list_columns(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let columns = state.columns.list_columns().await?;
    Ok(HttpResponse::Ok().json(columns))
}

/// Adds a column to a board. Column statuses are unique across all boards, so `409 Conflict`
/// is returned for any status already in use, `todo`/`doing`/`done` included once a board exists.
#[post("")]
pub async fn create_column(
    state: web::Data<AppState>,
    column_data: web::Json<NewColumn>,
) -> Result<impl Responder, AppError> {
    let column = state.columns.create_column(column_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(column))
}

#[get("/{id}")]
pub async fn get_column(
    state: web::Data<AppState>,
    column_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let column = state.columns.get_column(column_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(column))
}

#[put("/{id}")]
pub async fn update_column(
    state: web::Data<AppState>,
    column_id: web::Path<i32>,
    patch: web::Json<ColumnPatch>,
) -> Result<impl Responder, AppError> {
    patch.validate()?;
    let column = state
        .columns
        .update_column(column_id.into_inner(), patch.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(column))
}

#[delete("/{id}")]
pub async fn delete_column(
    state: web::Data<AppState>,
    column_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let confirmation = state.columns.delete_column(column_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(confirmation))
}

#[get("/{id}/tasks")]
pub async fn list_column_tasks(
    state: web::Data<AppState>,
    column_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.list_tasks_by_column(column_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(tasks))
}
