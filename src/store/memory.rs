use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::routes::tasks::model::{NewTask, Task, TaskChanges};
use crate::routes::users::User;

/// Process-local store. Tasks are kept in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    tasks: RwLock<Vec<Task>>,
    revoked: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn build_task(user_id: Uuid, task: NewTask) -> Task {
    let now = Utc::now();
    Task {
        id: Uuid::new_v4(),
        user_id,
        title: task.title,
        description: task.description,
        completed: task.completed,
        category: task.category,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == username) {
            return Err(StoreError::UsernameTaken);
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn create_task(&self, user_id: Uuid, task: NewTask) -> Result<Task, StoreError> {
        let task = build_task(user_id, task);
        self.tasks.write().await.push(task.clone());
        Ok(task)
    }

    async fn create_tasks(
        &self,
        user_id: Uuid,
        tasks: Vec<NewTask>,
    ) -> Result<Vec<Task>, StoreError> {
        let created: Vec<Task> = tasks.into_iter().map(|t| build_task(user_id, t)).collect();
        self.tasks.write().await.extend(created.iter().cloned());
        Ok(created)
    }

    async fn list_tasks(&self, user_id: Uuid) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn update_task(
        &self,
        id: Uuid,
        changes: TaskChanges,
    ) -> Result<Option<Task>, StoreError> {
        let mut tasks = self.tasks.write().await;
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            task.title = title;
        }
        if let Some(description) = changes.description {
            task.description = description;
        }
        if let Some(completed) = changes.completed {
            task.completed = completed;
        }
        if let Some(category) = changes.category {
            task.category = category;
        }
        task.updated_at = Utc::now();

        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        Ok(tasks.len() < before)
    }

    async fn revoke_token(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), StoreError> {
        let now = Utc::now();
        let mut revoked = self.revoked.write().await;
        revoked.retain(|_, expiry| *expiry > now);
        if expires_at > now {
            revoked.entry(token.to_string()).or_insert(expires_at);
        }
        Ok(())
    }

    async fn is_token_revoked(&self, token: &str) -> Result<bool, StoreError> {
        let revoked = self.revoked.read().await;
        Ok(revoked
            .get(token)
            .is_some_and(|expires_at| *expires_at > Utc::now()))
    }
}
