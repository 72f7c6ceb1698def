use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{NewTask, TaskPatch},
    services::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use validator::Validate;

/// Retrieves every task, ordered by id.
#[get("")]
pub async fn list_tasks(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.list_tasks().await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task in a column and records a `create` audit entry.
///
/// ## Request Body:
/// - `column_id`: the owning column (required, must exist).
/// - `title`: unique across all tasks.
/// - `description` (optional).
///
/// ## Responses:
/// - `201 Created`: the new `Task`.
/// - `400 Bad Request`: `column_id` missing or zero.
/// - `404 Not Found`: the column does not exist.
/// - `409 Conflict`: a task with this title already exists.
/// - `422 Unprocessable Entity`: title or description too long.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_data: web::Json<NewTask>,
) -> Result<impl Responder, AppError> {
    log::debug!("{} creates task {:?}", user.email(), task_data.title);

    let task = state.tasks.create_task(task_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(task))
}

#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let task = state.tasks.get_task(task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Updates title and/or description and records one `update` audit entry.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    task_id: web::Path<i32>,
    patch: web::Json<TaskPatch>,
) -> Result<impl Responder, AppError> {
    patch.validate()?;
    let task = state
        .tasks
        .update_task(task_id.into_inner(), patch.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task and records a `delete` audit entry. `404 Not Found` writes no entry.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let confirmation = state.tasks.delete_task(task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(confirmation))
}

#[get("/{id}/logs")]
pub async fn list_task_logs(
    state: web::Data<AppState>,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let logs = state.tasks.list_task_logs(task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(logs))
}
