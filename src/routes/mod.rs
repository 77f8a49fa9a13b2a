use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub mod auth;
pub mod health;
pub mod middleware_auth;
pub mod todos;

pub use health::health;

use crate::state::AppState;
use middleware_auth::JwtUser;

pub fn routes(state: AppState) -> Router<AppState> {
    let todo_router = Router::new()
        .route("/", post(todos::routes::create).get(todos::routes::list))
        .route("/stats", get(todos::routes::stats))
        .route("/suggestion", get(todos::routes::suggestion))
        .route(
            "/{id}",
            get(todos::routes::get)
                .put(todos::routes::edit)
                .delete(todos::routes::delete),
        )
        .route("/{id}/complete", post(todos::routes::toggle_complete));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/auth/register", post(auth::routes::register))
        .route("/auth/login", post(auth::routes::login))
        .nest(
            "/api",
            Router::new()
                .route("/me", get(me_handler))
                .nest("/todos", todo_router)
                .layer(middleware::from_fn_with_state(state, middleware_auth::resolve_session)),
        )
}

async fn root() -> &'static str {
    "Welcome to the todo API written in Rust"
}

async fn me_handler(JwtUser(user_id): JwtUser) -> String {
    format!("user_id: {}", user_id)
}
