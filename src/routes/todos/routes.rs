use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use uuid::Uuid;

use super::schema::FieldError;
use super::service::{self, TodoError};
use super::{random_suggestion, CreateTodoRequest, EditTodoRequest, Reply, ToggleCompleteRequest};
use crate::routes::middleware_auth::Session;
use crate::state::AppState;

fn reply_error(operation: &'static str, err: TodoError) -> Reply {
    match &err {
        TodoError::Store(e) => tracing::error!(error = %e, operation, "store failure"),
        TodoError::Validation(errors) => tracing::debug!(?errors, operation, "rejected input"),
        TodoError::Unauthorized | TodoError::NotFound => {
            tracing::debug!(error = %err, operation, "request refused")
        }
    }
    Reply::from(err)
}

/// Anonymous callers are refused before their input is looked at.
fn require_session(operation: &'static str, session: Option<Uuid>) -> Result<(), Reply> {
    match session {
        Some(_) => Ok(()),
        None => Err(reply_error(operation, TodoError::Unauthorized)),
    }
}

/// Malformed bodies are reported like any other invalid input.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, TodoError> {
    payload.map(|Json(body)| body).map_err(|e| {
        TodoError::Validation(vec![FieldError::new("body", format!("Invalid request body: {}", e.body_text()))])
    })
}

/// List the caller's todos, newest first
pub async fn list(
    State(state): State<AppState>,
    Session(session): Session,
) -> impl IntoResponse {
    match service::list_todos(state.todos.as_ref(), session).await {
        Ok(todos) => (StatusCode::OK, Json(todos)).into_response(),
        Err(e) => reply_error("list", e).into_response(),
    }
}

pub async fn stats(
    State(state): State<AppState>,
    Session(session): Session,
) -> impl IntoResponse {
    match service::todo_stats(state.todos.as_ref(), session).await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => reply_error("stats", e).into_response(),
    }
}

/// Random placeholder for the create form
pub async fn suggestion() -> impl IntoResponse {
    Json(random_suggestion())
}

pub async fn get(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<String>,
) -> Reply {
    if let Err(reply) = require_session("get", session) {
        return reply;
    }

    let result = match service::parse_todo_id(&id) {
        Ok(id) => service::get_todo(state.todos.as_ref(), session, id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(todo) => Reply::success(StatusCode::OK, "Todo loaded", Some(todo)),
        Err(e) => reply_error("get", e),
    }
}

pub async fn create(
    State(state): State<AppState>,
    Session(session): Session,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Reply {
    if let Err(reply) = require_session("create", session) {
        return reply;
    }

    let result = match body(payload) {
        Ok(request) => service::create_todo(state.todos.as_ref(), &state.schema, session, request).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(todo) => Reply::success(StatusCode::CREATED, "Todo created successfully", Some(todo)),
        Err(e) => reply_error("create", e),
    }
}

pub async fn edit(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<String>,
    payload: Result<Json<EditTodoRequest>, JsonRejection>,
) -> Reply {
    if let Err(reply) = require_session("edit", session) {
        return reply;
    }

    let result = async {
        let id = service::parse_todo_id(&id)?;
        let request = body(payload)?;
        service::edit_todo(state.todos.as_ref(), &state.schema, session, id, request).await
    }
    .await;

    match result {
        Ok(todo) => Reply::success(StatusCode::OK, "Todo updated successfully", Some(todo)),
        Err(e) => reply_error("edit", e),
    }
}

pub async fn toggle_complete(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<String>,
    payload: Result<Json<ToggleCompleteRequest>, JsonRejection>,
) -> Reply {
    if let Err(reply) = require_session("toggle", session) {
        return reply;
    }

    let result = async {
        let id = service::parse_todo_id(&id)?;
        let request = body(payload)?;
        service::toggle_todo_complete(state.todos.as_ref(), session, id, request.completed).await
    }
    .await;

    match result {
        Ok(todo) => {
            let message = if todo.completed {
                "Todo marked as completed"
            } else {
                "Todo marked as incomplete"
            };
            Reply::success(StatusCode::OK, message, Some(todo))
        }
        Err(e) => reply_error("toggle", e),
    }
}

pub async fn delete(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<String>,
) -> Reply {
    if let Err(reply) = require_session("delete", session) {
        return reply;
    }

    let result = match service::parse_todo_id(&id) {
        Ok(id) => service::delete_todo(state.todos.as_ref(), session, id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => Reply::success(StatusCode::OK, "Todo deleted successfully", None),
        Err(e) => reply_error("delete", e),
    }
}
