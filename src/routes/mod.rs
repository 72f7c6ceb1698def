pub mod auth;
pub mod boards;
pub mod columns;
pub mod health;
pub mod projects;
pub mod tasks;

use actix_web::web;

/// Registers every `/api` resource. The caller wraps the scope with `AuthMiddleware`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::login)
            .service(auth::register),
    )
    .service(
        web::scope("/projects")
            .service(projects::list_projects)
            .service(projects::create_project)
            .service(projects::get_project)
            .service(projects::update_project)
            .service(projects::delete_project)
            .service(projects::list_project_boards)
            .service(projects::list_members)
            .service(projects::add_member)
            .service(projects::remove_member),
    )
    .service(
        web::scope("/boards")
            .service(boards::list_boards)
            .service(boards::create_board)
            .service(boards::get_board)
            .service(boards::update_board)
            .service(boards::delete_board)
            .service(boards::list_board_columns),
    )
    .service(
        web::scope("/columns")
            .service(columns::list_columns)
            .service(columns::create_column)
            .service(columns::get_column)
            .service(columns::update_column)
            .service(columns::delete_column)
            .service(columns::list_column_tasks),
    )
    .service(
        web::scope("/tasks")
            .service(tasks::list_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task)
            .service(tasks::list_task_logs),
    );
}
