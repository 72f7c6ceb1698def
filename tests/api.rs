mod common;

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App, Error};
use chrono::Duration;
use kanban_board::auth::{AuthMiddleware, TokenService};
use kanban_board::routes::{self, health};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

async fn service(
    h: &common::Harness,
) -> impl Service<Request, Response = ServiceResponse, Error = Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(h.state.clone()))
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(TokenService::new(
                        common::TEST_SECRET,
                        Duration::hours(1),
                    )))
                    .configure(routes::config),
            ),
    )
    .await
}

/// Sends `req` and returns the status plus the JSON body. Errors raised by the middleware are
/// rendered the same way the server would.
async fn send<S>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = Error>,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => {
            let status = resp.status();
            let body = test::read_body(resp).await;
            let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
            (status, json)
        }
        Err(err) => (err.as_response_error().status_code(), Value::Null),
    }
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

async fn register<S>(app: &S, username: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse, Error = Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "password123"
        }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[actix_rt::test]
async fn test_health_is_public() {
    let h = common::harness();
    let app = service(&h).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[actix_rt::test]
async fn test_register_and_login() {
    let h = common::harness();
    let app = service(&h).await;

    let registered = register(&app, "ann").await;
    assert_eq!(registered["email"], "ann@example.com");
    assert!(registered["token"].as_str().is_some());

    let duplicate = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": "ann2",
            "email": "ann@example.com",
            "password": "password123"
        }))
        .to_request();
    let (status, body) = send(&app, duplicate).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User with this email already exists");

    let invalid = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": "bob",
            "email": "not-an-email",
            "password": "password123"
        }))
        .to_request();
    let (status, _) = send(&app, invalid).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let wrong_password = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"email": "ann@example.com", "password": "wrong-password"}))
        .to_request();
    let (status, body) = send(&app, wrong_password).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");

    let login = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"email": "ann@example.com", "password": "password123"}))
        .to_request();
    let (status, body) = send(&app, login).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], registered["user_id"]);
}

#[actix_rt::test]
async fn test_api_requires_token() {
    let h = common::harness();
    let app = service(&h).await;

    let req = test::TestRequest::get().uri("/api/projects").to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/projects")
        .insert_header(bearer("garbage"))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_hierarchy_flow() {
    let h = common::harness();
    let app = service(&h).await;

    let ann = register(&app, "ann").await;
    let token = ann["token"].as_str().unwrap_or_default().to_string();

    let req = test::TestRequest::post()
        .uri("/api/projects")
        .insert_header(bearer(&token))
        .set_json(json!({"user_id": ann["user_id"], "name": "Apollo"}))
        .to_request();
    let (status, project) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    let project_id = project["id"].as_i64().unwrap_or_default();

    let req = test::TestRequest::post()
        .uri("/api/projects")
        .insert_header(bearer(&token))
        .set_json(json!({"name": "Orphan"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "user_id is required");

    let req = test::TestRequest::post()
        .uri("/api/boards")
        .insert_header(bearer(&token))
        .set_json(json!({"project_id": project_id, "name": "Sprint1"}))
        .to_request();
    let (status, board) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(board["project_id"], project_id);
    let statuses: Vec<&str> = board["columns"]
        .as_array()
        .map(|cols| cols.iter().filter_map(|c| c["status"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(statuses, vec!["todo", "doing", "done"]);
    let todo = board["columns"][0]["id"].as_i64().unwrap_or_default();

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(bearer(&token))
        .set_json(json!({"column_id": todo, "title": "Write docs"}))
        .to_request();
    let (status, task) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    let task_id = task["id"].as_i64().unwrap_or_default();

    let req = test::TestRequest::get()
        .uri(&format!("/api/columns/{}/tasks", todo))
        .insert_header(bearer(&token))
        .to_request();
    let (status, tasks) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tasks.as_array().map(Vec::len), Some(1));

    let req = test::TestRequest::delete()
        .uri(&format!("/api/tasks/{}", task_id))
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task deleted successfully");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/tasks/{}", task_id))
        .insert_header(bearer(&token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{}/logs", task_id))
        .insert_header(bearer(&token))
        .to_request();
    let (status, logs) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let actions: Vec<&str> = logs
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry["action_type"].as_str())
                .collect()
        })
        .unwrap_or_default();
    assert_eq!(actions, vec!["create", "delete"]);
}

#[actix_rt::test]
async fn test_member_endpoints() {
    let h = common::harness();
    let app = service(&h).await;

    let ann = register(&app, "ann").await;
    let bob = register(&app, "bob").await;
    let token = ann["token"].as_str().unwrap_or_default().to_string();

    let req = test::TestRequest::post()
        .uri("/api/projects")
        .insert_header(bearer(&token))
        .set_json(json!({"user_id": ann["user_id"], "name": "Apollo"}))
        .to_request();
    let (_, project) = send(&app, req).await;
    let members_uri = format!("/api/projects/{}/members", project["id"]);

    let add = || {
        test::TestRequest::post()
            .uri(&members_uri)
            .insert_header(bearer(&token))
            .set_json(json!({"user_id": bob["user_id"], "role": "viewer"}))
            .to_request()
    };
    let (status, _) = send(&app, add()).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = send(&app, add()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User is already in the project");

    let req = test::TestRequest::get()
        .uri(&members_uri)
        .insert_header(bearer(&token))
        .to_request();
    let (status, members) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(members.as_array().map(Vec::len), Some(2));

    let remove = || {
        test::TestRequest::delete()
            .uri(&members_uri)
            .insert_header(bearer(&token))
            .set_json(json!({"user_id": bob["user_id"]}))
            .to_request()
    };
    let (status, _) = send(&app, remove()).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, remove()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User is not in the project");
}

#[actix_rt::test]
async fn test_missing_parent_id_beats_length_limits() {
    let h = common::harness();
    let app = service(&h).await;

    let ann = register(&app, "ann").await;
    let token = ann["token"].as_str().unwrap_or_default().to_string();

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(bearer(&token))
        .set_json(json!({"column_id": 0, "title": "t".repeat(300)}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "column_id is required");

    let req = test::TestRequest::post()
        .uri("/api/projects")
        .insert_header(bearer(&token))
        .set_json(json!({"user_id": ann["user_id"], "name": "Apollo"}))
        .to_request();
    let (_, project) = send(&app, req).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/projects/{}/members", project["id"]))
        .insert_header(bearer(&token))
        .set_json(json!({"user_id": 0, "role": "r".repeat(65)}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "user_id is required");

    let req = test::TestRequest::post()
        .uri(&format!("/api/projects/{}/members", project["id"]))
        .insert_header(bearer(&token))
        .set_json(json!({"user_id": ann["user_id"], "role": "r".repeat(65)}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
