use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{MemberRemoval, NewMember, NewProject, ProjectPatch},
    services::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use validator::Validate;

/// Lists every project.
#[get("")]
pub async fn list_projects(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let projects = state.projects.list_projects().await?;
    Ok(HttpResponse::Ok().json(projects))
}

/// Creates a project.
///
/// ## Responses:
/// - `201 Created`: the new `Project`; its owner is now a member with role `user`.
/// - `400 Bad Request`: `user_id` missing or zero.
/// - `404 Not Found`: the owner does not exist.
/// - `409 Conflict`: a project with this name already exists.
#[post("")]
pub async fn create_project(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    project_data: web::Json<NewProject>,
) -> Result<impl Responder, AppError> {
    log::debug!("{} creates project {:?}", user.email(), project_data.name);

    let project = state.projects.create_project(project_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(project))
}

#[get("/{id}")]
pub async fn get_project(
    state: web::Data<AppState>,
    project_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let project = state.projects.get_project(project_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(project))
}

/// Updates name and/or description. Empty strings leave the field unchanged unless
/// explicit patch semantics are configured.
#[put("/{id}")]
pub async fn update_project(
    state: web::Data<AppState>,
    project_id: web::Path<i32>,
    patch: web::Json<ProjectPatch>,
) -> Result<impl Responder, AppError> {
    patch.validate()?;
    let project = state
        .projects
        .update_project(project_id.into_inner(), patch.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(project))
}

/// Deletes a project together with its boards, columns, tasks and memberships.
#[delete("/{id}")]
pub async fn delete_project(
    state: web::Data<AppState>,
    project_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let confirmation = state.projects.delete_project(project_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(confirmation))
}

#[get("/{id}/boards")]
pub async fn list_project_boards(
    state: web::Data<AppState>,
    project_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let boards = state
        .projects
        .list_project_boards(project_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(boards))
}

#[get("/{id}/members")]
pub async fn list_members(
    state: web::Data<AppState>,
    project_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let members = state.members.list_members(project_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(members))
}

/// Adds a user to the project.
///
/// ## Responses:
/// - `201 Created`: confirmation message.
/// - `400 Bad Request`: `user_id` or `role` missing.
/// - `404 Not Found`: project or user does not exist.
/// - `409 Conflict`: the user is already a member.
#[post("/{id}/members")]
pub async fn add_member(
    state: web::Data<AppState>,
    project_id: web::Path<i32>,
    member_data: web::Json<NewMember>,
) -> Result<impl Responder, AppError> {
    let confirmation = state
        .members
        .add_member(project_id.into_inner(), member_data.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(confirmation))
}

#[delete("/{id}/members")]
pub async fn remove_member(
    state: web::Data<AppState>,
    project_id: web::Path<i32>,
    removal: web::Json<MemberRemoval>,
) -> Result<impl Responder, AppError> {
    let confirmation = state
        .members
        .remove_member(project_id.into_inner(), removal.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(confirmation))
}
