//! Persistence for users, tasks and revoked tokens.
//!
//! Handlers only talk to [`Store`]; [`PgStore`] backs production and
//! [`MemoryStore`] backs tests and `STORE=memory`.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::routes::tasks::model::{NewTask, Task, TaskChanges};
use crate::routes::users::User;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already exists")]
    UsernameTaken,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn create_task(&self, user_id: Uuid, task: NewTask) -> Result<Task, StoreError>;

    /// Inserts all tasks or none of them.
    async fn create_tasks(&self, user_id: Uuid, tasks: Vec<NewTask>)
        -> Result<Vec<Task>, StoreError>;

    /// Newest first.
    async fn list_tasks(&self, user_id: Uuid) -> Result<Vec<Task>, StoreError>;

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError>;

    async fn update_task(&self, id: Uuid, changes: TaskChanges)
        -> Result<Option<Task>, StoreError>;

    /// Returns false when there was nothing to delete.
    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn revoke_token(&self, token: &str, expires_at: DateTime<Utc>)
        -> Result<(), StoreError>;

    /// Tokens past their expiry are no longer reported.
    async fn is_token_revoked(&self, token: &str) -> Result<bool, StoreError>;
}
