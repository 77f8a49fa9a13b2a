use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("unique constraint violated")]
    Conflict,

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Postgres reports unique violations as SQLSTATE 23505.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        if let Some(db_error) = err.as_database_error() {
            if db_error.code() == Some(std::borrow::Cow::Borrowed("23505")) {
                return StoreError::Conflict;
            }
        }
        StoreError::Database(err)
    }
}

pub async fn connect(database_url: &str) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| StoreError::Unavailable(format!("migration failed: {}", e)))?;

    Ok(pool)
}
