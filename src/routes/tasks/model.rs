use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use super::status::TaskStatus;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn status(&self) -> TaskStatus {
        TaskStatus::from_task(&self.category, self.completed)
    }
}

/// A validated task ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub category: String,
}

/// Fields to overwrite; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub category: String,
    pub user_id: Uuid,
    pub status: TaskStatus,
    pub icon: &'static str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        let status = task.status();
        TaskResponse {
            id: task.id,
            title: task.title,
            description: task.description,
            completed: task.completed,
            category: task.category,
            user_id: task.user_id,
            status,
            icon: status.icon(),
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BoardColumn {
    pub status: TaskStatus,
    pub tasks: Vec<TaskResponse>,
}

/// Every status gets a column, in board order, even when it is empty.
/// Tasks keep their relative order inside a column.
pub fn group_by_status(tasks: Vec<Task>) -> Vec<BoardColumn> {
    let mut columns: Vec<BoardColumn> = TaskStatus::ALL
        .into_iter()
        .map(|status| BoardColumn { status, tasks: Vec::new() })
        .collect();

    for task in tasks {
        let status = task.status();
        if let Some(column) = columns.iter_mut().find(|c| c.status == status) {
            column.tasks.push(task.into());
        }
    }

    columns
}
