use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::routes::tasks::model::{NewTask, Task, TaskChanges};
use crate::routes::users::User;

const TASK_COLUMNS: &str =
    "id, user_id, title, description, completed, category, created_at, updated_at";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects and brings the schema up to date.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("database migrations applied");

        Ok(Self { pool })
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|db_error| db_error.code())
        .is_some_and(|code| code == "23505")
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::UsernameTaken
            } else {
                StoreError::Database(e)
            }
        })
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_task(&self, user_id: Uuid, task: NewTask) -> Result<Task, StoreError> {
        let query = format!(
            r#"
            INSERT INTO tasks (id, user_id, title, description, completed, category)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TASK_COLUMNS}
            "#
        );

        let rec = sqlx::query_as::<_, Task>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.completed)
            .bind(&task.category)
            .fetch_one(&self.pool)
            .await?;

        Ok(rec)
    }

    async fn create_tasks(
        &self,
        user_id: Uuid,
        tasks: Vec<NewTask>,
    ) -> Result<Vec<Task>, StoreError> {
        let query = format!(
            r#"
            INSERT INTO tasks (id, user_id, title, description, completed, category)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TASK_COLUMNS}
            "#
        );

        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(tasks.len());

        for task in tasks {
            // clock_timestamp() defaults advance per row, keeping submission order.
            let rec = sqlx::query_as::<_, Task>(&query)
                .bind(Uuid::new_v4())
                .bind(user_id)
                .bind(&task.title)
                .bind(&task.description)
                .bind(task.completed)
                .bind(&task.category)
                .fetch_one(&mut *tx)
                .await?;
            created.push(rec);
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn list_tasks(&self, user_id: Uuid) -> Result<Vec<Task>, StoreError> {
        let query = format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#
        );

        let rec = sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rec)
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1");

        let rec = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(rec)
    }

    async fn update_task(
        &self,
        id: Uuid,
        changes: TaskChanges,
    ) -> Result<Option<Task>, StoreError> {
        let query = format!(
            r#"
            UPDATE tasks
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                completed = COALESCE($4, completed),
                category = COALESCE($5, category),
                updated_at = clock_timestamp()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        );

        let rec = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(changes.title)
            .bind(changes.description)
            .bind(changes.completed)
            .bind(changes.category)
            .fetch_optional(&self.pool)
            .await?;

        Ok(rec)
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_token(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let pruned = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at <= NOW()")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if pruned > 0 {
            tracing::debug!(pruned, "expired revocations removed");
        }

        sqlx::query(
            r#"
            INSERT INTO revoked_tokens (token, expires_at)
            VALUES ($1, $2)
            ON CONFLICT (token) DO NOTHING
            "#,
        )
        .bind(token)
        .bind(expires_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn is_token_revoked(&self, token: &str) -> Result<bool, StoreError> {
        let revoked = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM revoked_tokens WHERE token = $1 AND expires_at > NOW())",
        )
        .bind(token)
        .fetch_one(&self.pool)
        .await?;

        Ok(revoked)
    }
}
