use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::memory::{MemoryTodoRepository, MemoryUserRepository};
use crate::routes::auth::queries::{PgUserRepository, UserRepository};
use crate::routes::auth::JwtKeys;
use crate::routes::todos::queries::{PgTodoRepository, TodoRepository};
use crate::routes::todos::schema::TodoSchema;

/// Per-request context shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub todos: Arc<dyn TodoRepository>,
    pub users: Arc<dyn UserRepository>,
    pub schema: TodoSchema,
    pub jwt: JwtKeys,
}

impl AppState {
    pub fn postgres(db: PgPool, config: &Config) -> Self {
        Self {
            todos: Arc::new(PgTodoRepository::new(db.clone())),
            users: Arc::new(PgUserRepository::new(db)),
            schema: TodoSchema::new(config.title_max_len, config.description_max_len),
            jwt: JwtKeys::from_secret(&config.jwt_secret),
        }
    }

    pub fn in_memory(config: &Config) -> Self {
        Self::in_memory_with(
            TodoSchema::new(config.title_max_len, config.description_max_len),
            &config.jwt_secret,
        )
    }

    pub fn in_memory_with(schema: TodoSchema, jwt_secret: &str) -> Self {
        Self {
            todos: Arc::new(MemoryTodoRepository::default()),
            users: Arc::new(MemoryUserRepository::default()),
            schema,
            jwt: JwtKeys::from_secret(jwt_secret),
        }
    }
}
