pub mod queries;
pub mod routes;
pub mod schema;
pub mod service;

use axum::{http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use schema::FieldError;
use service::TodoError;

// MODELS

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditTodoRequest {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToggleCompleteRequest {
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoStats {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
}

impl TodoStats {
    pub fn from_todos(todos: &[Todo]) -> Self {
        let completed = todos.iter().filter(|t| t.completed).count();
        Self {
            total: todos.len(),
            completed,
            remaining: todos.len() - completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    pub description: String,
}

/// Uniform outcome body returned by every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub todo: Option<Todo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>, todo: Option<Todo>) -> Self {
        Self {
            success: true,
            message: message.into(),
            todo,
            errors: Vec::new(),
        }
    }

    pub fn failed(err: &TodoError) -> Self {
        let errors = match err {
            TodoError::Validation(errors) => errors.clone(),
            _ => Vec::new(),
        };
        Self {
            success: false,
            message: err.user_message(),
            todo: None,
            errors,
        }
    }
}

/// HTTP reply pairing a status code with an [`ActionResult`].
pub struct Reply(pub StatusCode, pub ActionResult);

impl Reply {
    pub fn success(status: StatusCode, message: impl Into<String>, todo: Option<Todo>) -> Self {
        Reply(status, ActionResult::ok(message, todo))
    }
}

impl From<TodoError> for Reply {
    fn from(err: TodoError) -> Self {
        Reply(err.status_code(), ActionResult::failed(&err))
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> axum::response::Response {
        (self.0, Json(self.1)).into_response()
    }
}

// HELPER FUNCTIONS

/// Sample todos offered as placeholders on the create form.
pub const SUGGESTIONS: [(&str, &str); 10] = [
    (
        "Buy groceries for the week",
        "Get milk, eggs, bread, fruits, vegetables, and other essentials from the supermarket",
    ),
    (
        "Schedule dentist appointment",
        "Call the dental clinic to book a checkup appointment for next month",
    ),
    (
        "Finish reading current book",
        "Complete the last three chapters and write a brief review",
    ),
    (
        "Plan weekend trip",
        "Research destinations, book accommodation, and create an itinerary for the family vacation",
    ),
    (
        "Exercise for 30 minutes",
        "Go for a jog in the park or do a home workout routine",
    ),
    (
        "Call mom and catch up",
        "Have a video call to check in and share recent updates",
    ),
    (
        "Organize home office",
        "Declutter desk, file documents, and clean up workspace for better productivity",
    ),
    (
        "Pay monthly bills",
        "Review and pay electricity, internet, and credit card bills before due date",
    ),
    (
        "Learn a new recipe",
        "Try making homemade pasta or baking sourdough bread this weekend",
    ),
    (
        "Clean out email inbox",
        "Unsubscribe from unwanted newsletters and organize important emails into folders",
    ),
];

/// Pick a random placeholder todo
pub fn random_suggestion() -> Suggestion {
    use rand::seq::SliceRandom;

    let (title, description) = SUGGESTIONS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(SUGGESTIONS[0]);

    Suggestion {
        title: title.to_string(),
        description: description.to_string(),
    }
}
