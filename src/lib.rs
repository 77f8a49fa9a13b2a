//! Personal todo service: authenticated users create, edit, complete and
//! delete their own todos over a JSON API.

pub mod config;
pub mod db;
pub mod logging;
pub mod memory;
pub mod routes;
pub mod state;
pub mod view;

use axum::http::{HeaderValue, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::state::AppState;

pub fn app_with_state(state: AppState) -> Router {
    routes::routes(state.clone()).with_state(state)
}

pub fn app(state: AppState, config: &Config) -> Router {
    app_with_state(state).layer(cors_layer(config))
}

fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    match config.cors_origin.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => layer.allow_origin(origin),
        Some(Err(_)) => {
            tracing::warn!("CORS_ORIGIN is not a valid header value, allowing any origin");
            layer.allow_origin(Any)
        }
        None => layer.allow_origin(Any),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::todos::schema::TodoSchema;
    use crate::routes::todos::{ActionResult, Todo, TodoStats};
    use axum::{
        body::{self, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt; // for `oneshot`
    use uuid::Uuid;

    const SECRET: &str = "test-secret";

    fn test_app() -> (Router, AppState) {
        let state = AppState::in_memory_with(TodoSchema::default(), SECRET);
        (app_with_state(state.clone()), state)
    }

    fn token_for(state: &AppState, user_id: Uuid) -> String {
        state.jwt.issue(user_id).unwrap()
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(b) => builder
                .header("content-type", "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn list(app: &Router, token: Option<&str>) -> Vec<Todo> {
        let (status, bytes) = send(app, "GET", "/api/todos", token, None).await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_slice(&bytes).unwrap()
    }

    fn result(bytes: &[u8]) -> ActionResult {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn get_health_returns_ok() {
        let (app, _) = test_app();

        let (status, bytes) = send(&app, "GET", "/health", None, None).await;

        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], 200);
    }

    #[tokio::test]
    async fn create_toggle_delete_scenario() {
        let (app, state) = test_app();
        let token = token_for(&state, Uuid::new_v4());
        let token = Some(token.as_str());

        let (status, bytes) = send(
            &app,
            "POST",
            "/api/todos",
            token,
            Some(json!({"title": "Buy milk", "description": "2%"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let created = result(&bytes);
        assert!(created.success);
        assert_eq!(created.message, "Todo created successfully");
        let id = created.todo.unwrap().id;

        let todos = list(&app, token).await;
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].title, "Buy milk");
        assert!(!todos[0].completed);

        let uri = format!("/api/todos/{}/complete", id);
        let (status, bytes) = send(&app, "POST", &uri, token, Some(json!({"completed": true}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(result(&bytes).message, "Todo marked as completed");
        assert!(list(&app, token).await[0].completed);

        let (status, bytes) = send(&app, "POST", &uri, token, Some(json!({"completed": true}))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(result(&bytes).success);

        let (status, bytes) = send(&app, "DELETE", &format!("/api/todos/{}", id), token, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(result(&bytes).message, "Todo deleted successfully");
        assert!(list(&app, token).await.is_empty());
    }

    #[tokio::test]
    async fn anonymous_create_is_refused() {
        let (app, _) = test_app();

        let (status, bytes) = send(&app, "POST", "/api/todos", None, Some(json!({"title": "Buy milk"}))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let body = result(&bytes);
        assert!(!body.success);
        assert_eq!(body.message, "Please sign in to manage your todos");
        assert!(list(&app, None).await.is_empty());
    }

    #[tokio::test]
    async fn anonymous_caller_is_refused_before_input_checks() {
        let (app, _) = test_app();

        let request = Request::builder()
            .method("POST")
            .uri("/api/todos")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let refused = result(&bytes);
        assert_eq!(refused.message, "Please sign in to manage your todos");
        assert!(refused.errors.is_empty());

        let attempts = [
            ("PUT", "/api/todos/not-a-uuid", Some(json!({"title": ""}))),
            ("POST", "/api/todos/not-a-uuid/complete", Some(json!({"completed": true}))),
            ("DELETE", "/api/todos/not-a-uuid", None),
            ("GET", "/api/todos/not-a-uuid", None),
        ];
        for (method, path, body) in attempts {
            let (status, bytes) = send(&app, method, path, None, body).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, path);
            assert_eq!(result(&bytes).message, "Please sign in to manage your todos");
        }
    }

    #[tokio::test]
    async fn empty_title_reports_field_error() {
        let (app, state) = test_app();
        let owner = Uuid::new_v4();
        let token = token_for(&state, owner);

        let (status, bytes) = send(&app, "POST", "/api/todos", Some(token.as_str()), Some(json!({"title": ""}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body = result(&bytes);
        assert_eq!(body.errors[0].field, "title");
        assert!(list(&app, Some(token.as_str())).await.is_empty());
    }

    #[tokio::test]
    async fn malformed_body_gets_uniform_reply() {
        let (app, state) = test_app();
        let token = token_for(&state, Uuid::new_v4());

        let (status, bytes) = send(&app, "POST", "/api/todos", Some(token.as_str()), Some(json!(["not", "an", "object"]))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body = result(&bytes);
        assert!(!body.success);
        assert_eq!(body.errors[0].field, "body");
    }

    #[tokio::test]
    async fn other_user_gets_not_found_and_todo_is_unchanged() {
        let (app, state) = test_app();
        let owner = token_for(&state, Uuid::new_v4());
        let intruder = token_for(&state, Uuid::new_v4());

        let (_, bytes) = send(&app, "POST", "/api/todos", Some(owner.as_str()), Some(json!({"title": "Mine"}))).await;
        let todo = result(&bytes).todo.unwrap();
        let uri = format!("/api/todos/{}", todo.id);

        let attempts = [
            ("GET", uri.clone(), None),
            ("PUT", uri.clone(), Some(json!({"title": "Hacked"}))),
            ("POST", format!("{}/complete", uri), Some(json!({"completed": true}))),
            ("DELETE", uri.clone(), None),
        ];
        for (method, path, body) in attempts {
            let (status, bytes) = send(&app, method, &path, Some(intruder.as_str()), body).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, path);
            assert_eq!(result(&bytes).message, "Todo not found");
        }

        assert_eq!(list(&app, Some(owner.as_str())).await, vec![todo]);
        assert!(list(&app, Some(intruder.as_str())).await.is_empty());
    }

    #[tokio::test]
    async fn edit_updates_title_and_description() {
        let (app, state) = test_app();
        let token = token_for(&state, Uuid::new_v4());
        let (_, bytes) = send(&app, "POST", "/api/todos", Some(token.as_str()), Some(json!({"title": "Old"}))).await;
        let id = result(&bytes).todo.unwrap().id;

        let (status, bytes) = send(
            &app,
            "PUT",
            &format!("/api/todos/{}", id),
            Some(token.as_str()),
            Some(json!({"title": "New", "description": "details"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let edited = result(&bytes).todo.unwrap();
        assert_eq!(edited.title, "New");
        assert_eq!(edited.description.as_deref(), Some("details"));

        let (status, bytes) = send(&app, "GET", &format!("/api/todos/{}", id), Some(token.as_str()), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(result(&bytes).todo.unwrap(), edited);
    }

    #[tokio::test]
    async fn invalid_id_is_not_found() {
        let (app, state) = test_app();
        let token = token_for(&state, Uuid::new_v4());

        let (status, bytes) = send(&app, "DELETE", "/api/todos/not-a-uuid", Some(token.as_str()), None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!result(&bytes).success);
    }

    #[tokio::test]
    async fn stats_and_suggestion() {
        let (app, state) = test_app();
        let token = token_for(&state, Uuid::new_v4());
        for title in ["a", "b"] {
            send(&app, "POST", "/api/todos", Some(token.as_str()), Some(json!({"title": title}))).await;
        }

        let (status, bytes) = send(&app, "GET", "/api/todos/stats", Some(token.as_str()), None).await;
        assert_eq!(status, StatusCode::OK);
        let stats: TodoStats = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(stats, TodoStats { total: 2, completed: 0, remaining: 2 });

        let (status, bytes) = send(&app, "GET", "/api/todos/suggestion", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(json["title"].as_str().is_some_and(|t| !t.is_empty()));
    }

    #[tokio::test]
    async fn bad_token_is_rejected() {
        let (app, _) = test_app();

        let (status, _) = send(&app, "GET", "/api/todos", Some("garbage"), None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn register_login_and_me() {
        let (app, _) = test_app();
        let credentials = json!({"email": "user@example.com", "password": "hunter2hunter2"});

        let (status, _) = send(&app, "POST", "/auth/register", None, Some(credentials.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _) = send(&app, "POST", "/auth/register", None, Some(credentials.clone())).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(
            &app,
            "POST",
            "/auth/login",
            None,
            Some(json!({"email": "user@example.com", "password": "wrong-password"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, bytes) = send(&app, "POST", "/auth/login", None, Some(credentials)).await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        let token = json["token"].as_str().unwrap().to_string();

        let (status, bytes) = send(&app, "GET", "/api/me", Some(token.as_str()), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(bytes).unwrap().starts_with("user_id: "));

        let (status, _) = send(&app, "GET", "/api/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn short_password_is_refused() {
        let (app, _) = test_app();

        let (status, _) = send(
            &app,
            "POST",
            "/auth/register",
            None,
            Some(json!({"email": "user@example.com", "password": "short"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
