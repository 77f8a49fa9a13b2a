use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::schema::TodoInput;
use super::Todo;
use crate::db::StoreError;

/// Persistence seam for todos. Every lookup is scoped by owner, so a
/// missing row and a row owned by someone else are indistinguishable.
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    async fn insert(&self, owner: Uuid, input: TodoInput) -> Result<Todo, StoreError>;
    /// Newest first by `created_at`.
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Todo>, StoreError>;
    async fn find_owned(&self, owner: Uuid, id: Uuid) -> Result<Option<Todo>, StoreError>;
    async fn update_content(
        &self,
        owner: Uuid,
        id: Uuid,
        input: TodoInput,
    ) -> Result<Option<Todo>, StoreError>;
    async fn set_completed(
        &self,
        owner: Uuid,
        id: Uuid,
        completed: bool,
    ) -> Result<Option<Todo>, StoreError>;
    /// Returns whether a row was removed.
    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> Result<bool, StoreError>;
}

pub struct PgTodoRepository {
    pool: PgPool,
}

impl PgTodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn insert(&self, owner: Uuid, input: TodoInput) -> Result<Todo, StoreError> {
        sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (id, title, description, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, completed, created_at, updated_at, created_by
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.title)
        .bind(&input.description)
        .bind(owner)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Todo>, StoreError> {
        sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, title, description, completed, created_at, updated_at, created_by
            FROM todos
            WHERE created_by = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)
    }

    async fn find_owned(&self, owner: Uuid, id: Uuid) -> Result<Option<Todo>, StoreError> {
        sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, title, description, completed, created_at, updated_at, created_by
            FROM todos
            WHERE id = $1 AND created_by = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)
    }

    async fn update_content(
        &self,
        owner: Uuid,
        id: Uuid,
        input: TodoInput,
    ) -> Result<Option<Todo>, StoreError> {
        sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET
                title = $3,
                description = $4,
                updated_at = NOW()
            WHERE id = $1 AND created_by = $2
            RETURNING id, title, description, completed, created_at, updated_at, created_by
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(&input.title)
        .bind(&input.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)
    }

    async fn set_completed(
        &self,
        owner: Uuid,
        id: Uuid,
        completed: bool,
    ) -> Result<Option<Todo>, StoreError> {
        sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET completed = $3, updated_at = NOW()
            WHERE id = $1 AND created_by = $2
            RETURNING id, title, description, completed, created_at, updated_at, created_by
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(completed)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)
    }

    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM todos
            WHERE id = $1 AND created_by = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;

        Ok(result.rows_affected() > 0)
    }
}
