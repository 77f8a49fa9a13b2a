//! Ownership-checked todo operations.
//!
//! Each function takes the caller's session explicitly and returns a
//! typed outcome; handlers turn that into the uniform reply body.

use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use super::queries::TodoRepository;
use super::schema::{FieldError, TodoSchema};
use super::{CreateTodoRequest, EditTodoRequest, Todo, TodoStats};
use crate::db::StoreError;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("no authenticated session")]
    Unauthorized,

    /// Also covers todos owned by another user.
    #[error("todo not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TodoError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TodoError::Validation(_) => StatusCode::BAD_REQUEST,
            TodoError::Unauthorized => StatusCode::UNAUTHORIZED,
            TodoError::NotFound => StatusCode::NOT_FOUND,
            TodoError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the user.
    pub fn user_message(&self) -> String {
        match self {
            TodoError::Validation(errors) => errors
                .first()
                .map(|e| e.message.clone())
                .unwrap_or_else(|| "Invalid input".to_string()),
            TodoError::Unauthorized => "Please sign in to manage your todos".to_string(),
            TodoError::NotFound => "Todo not found".to_string(),
            TodoError::Store(_) => "Something went wrong. Please try again.".to_string(),
        }
    }
}

fn require_session(session: Option<Uuid>) -> Result<Uuid, TodoError> {
    session.ok_or(TodoError::Unauthorized)
}

/// Ids arrive as raw path segments; an unparsable one cannot name a todo.
pub fn parse_todo_id(raw: &str) -> Result<Uuid, TodoError> {
    Uuid::parse_str(raw).map_err(|_| TodoError::NotFound)
}

pub async fn list_todos(
    repo: &dyn TodoRepository,
    session: Option<Uuid>,
) -> Result<Vec<Todo>, TodoError> {
    match session {
        Some(owner) => Ok(repo.list_by_owner(owner).await?),
        None => Ok(Vec::new()),
    }
}

pub async fn todo_stats(
    repo: &dyn TodoRepository,
    session: Option<Uuid>,
) -> Result<TodoStats, TodoError> {
    let todos = list_todos(repo, session).await?;
    Ok(TodoStats::from_todos(&todos))
}

pub async fn get_todo(
    repo: &dyn TodoRepository,
    session: Option<Uuid>,
    id: Uuid,
) -> Result<Todo, TodoError> {
    let owner = require_session(session)?;
    repo.find_owned(owner, id).await?.ok_or(TodoError::NotFound)
}

pub async fn create_todo(
    repo: &dyn TodoRepository,
    schema: &TodoSchema,
    session: Option<Uuid>,
    request: CreateTodoRequest,
) -> Result<Todo, TodoError> {
    let owner = require_session(session)?;
    let input = schema
        .validate(&request.title, request.description.as_deref())
        .map_err(TodoError::Validation)?;

    let todo = repo.insert(owner, input).await?;
    tracing::info!(todo_id = %todo.id, owner = %owner, "todo created");
    Ok(todo)
}

pub async fn edit_todo(
    repo: &dyn TodoRepository,
    schema: &TodoSchema,
    session: Option<Uuid>,
    id: Uuid,
    request: EditTodoRequest,
) -> Result<Todo, TodoError> {
    let owner = require_session(session)?;
    let input = schema
        .validate(&request.title, request.description.as_deref())
        .map_err(TodoError::Validation)?;

    let todo = repo
        .update_content(owner, id, input)
        .await?
        .ok_or(TodoError::NotFound)?;
    tracing::info!(todo_id = %todo.id, owner = %owner, "todo edited");
    Ok(todo)
}

/// Sets `completed` to the requested value; repeating it is harmless.
pub async fn toggle_todo_complete(
    repo: &dyn TodoRepository,
    session: Option<Uuid>,
    id: Uuid,
    completed: bool,
) -> Result<Todo, TodoError> {
    let owner = require_session(session)?;

    let todo = repo
        .set_completed(owner, id, completed)
        .await?
        .ok_or(TodoError::NotFound)?;
    tracing::info!(todo_id = %todo.id, completed, "todo completion set");
    Ok(todo)
}

pub async fn delete_todo(
    repo: &dyn TodoRepository,
    session: Option<Uuid>,
    id: Uuid,
) -> Result<(), TodoError> {
    let owner = require_session(session)?;

    if !repo.delete_owned(owner, id).await? {
        return Err(TodoError::NotFound);
    }
    tracing::info!(todo_id = %id, owner = %owner, "todo deleted");
    Ok(())
}
