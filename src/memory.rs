//! In-memory repositories, used by the test suite and when no
//! `DATABASE_URL` is configured.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::StoreError;
use crate::routes::auth::queries::{UserRecord, UserRepository};
use crate::routes::todos::queries::TodoRepository;
use crate::routes::todos::schema::TodoInput;
use crate::routes::todos::Todo;

#[derive(Default)]
pub struct MemoryTodoRepository {
    // insertion order
    rows: RwLock<Vec<Todo>>,
    fail_next: RwLock<bool>,
}

impl MemoryTodoRepository {
    async fn check_available(&self) -> Result<(), StoreError> {
        let mut fail = self.fail_next.write().await;
        if *fail {
            *fail = false;
            return Err(StoreError::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }

    /// Makes the next call fail with a store error.
    #[cfg(test)]
    pub async fn fail_next(&self) {
        *self.fail_next.write().await = true;
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    async fn modify<F>(&self, owner: Uuid, id: Uuid, apply: F) -> Result<Option<Todo>, StoreError>
    where
        F: FnOnce(&mut Todo) + Send,
    {
        self.check_available().await?;
        let mut rows = self.rows.write().await;
        Ok(rows
            .iter_mut()
            .find(|t| t.id == id && t.created_by == owner)
            .map(|todo| {
                apply(todo);
                todo.updated_at = Utc::now();
                todo.clone()
            }))
    }
}

#[async_trait]
impl TodoRepository for MemoryTodoRepository {
    async fn insert(&self, owner: Uuid, input: TodoInput) -> Result<Todo, StoreError> {
        self.check_available().await?;
        let now = Utc::now();
        let todo = Todo {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            completed: false,
            created_at: now,
            updated_at: now,
            created_by: owner,
        };
        self.rows.write().await.push(todo.clone());
        Ok(todo)
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Todo>, StoreError> {
        self.check_available().await?;
        let rows = self.rows.read().await;
        // reversed first so equal timestamps keep the later insert ahead
        let mut owned: Vec<Todo> = rows
            .iter()
            .rev()
            .filter(|t| t.created_by == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn find_owned(&self, owner: Uuid, id: Uuid) -> Result<Option<Todo>, StoreError> {
        self.check_available().await?;
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|t| t.id == id && t.created_by == owner)
            .cloned())
    }

    async fn update_content(
        &self,
        owner: Uuid,
        id: Uuid,
        input: TodoInput,
    ) -> Result<Option<Todo>, StoreError> {
        self.modify(owner, id, move |todo| {
            todo.title = input.title;
            todo.description = input.description;
        })
        .await
    }

    async fn set_completed(
        &self,
        owner: Uuid,
        id: Uuid,
        completed: bool,
    ) -> Result<Option<Todo>, StoreError> {
        self.modify(owner, id, move |todo| todo.completed = completed).await
    }

    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> Result<bool, StoreError> {
        self.check_available().await?;
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|t| !(t.id == id && t.created_by == owner));
        Ok(rows.len() < before)
    }
}

#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<Vec<UserRecord>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, email: &str, password_hash: &str) -> Result<UserRecord, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == email) {
            return Err(StoreError::Conflict);
        }
        let user = UserRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str) -> TodoInput {
        TodoInput {
            title: title.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_delete_only_removes_owned_rows() {
        let repo = MemoryTodoRepository::default();
        let owner = Uuid::new_v4();
        let todo = repo.insert(owner, input("Task")).await.unwrap();

        assert!(!repo.delete_owned(Uuid::new_v4(), todo.id).await.unwrap());
        assert!(repo.delete_owned(owner, todo.id).await.unwrap());
        assert_eq!(repo.len().await, 0);
    }

    #[tokio::test]
    async fn test_injected_failure_is_one_shot() {
        let repo = MemoryTodoRepository::default();
        repo.fail_next().await;

        assert!(repo.insert(Uuid::new_v4(), input("Task")).await.is_err());
        assert!(repo.insert(Uuid::new_v4(), input("Task")).await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = MemoryUserRepository::default();
        repo.insert("a@example.com", "hash").await.unwrap();

        let err = repo.insert("a@example.com", "hash").await.unwrap_err();

        assert!(matches!(err, StoreError::Conflict));
    }
}
