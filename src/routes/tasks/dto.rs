use serde::Deserialize;

use crate::error::ApiError;
use super::model::{NewTask, TaskChanges};
use super::status::{TaskStatus, DEFAULT_CATEGORY};

#[derive(Debug, Deserialize)]
pub struct CreateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub category: Option<String>,
}

/// Task as the browser keeps it in local storage before the user logs in.
/// The local `id` and `icon` are ignored; the server assigns both.
/// Guest boards routinely carry empty descriptions, so only the title is required.
#[derive(Debug, Deserialize)]
pub struct LocalTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
}

fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::bad_request(format!("{field} should not be empty"))),
    }
}

fn not_blank(value: Option<String>, field: &str) -> Result<Option<String>, ApiError> {
    match value {
        Some(v) if v.trim().is_empty() => {
            Err(ApiError::bad_request(format!("{field} should not be empty")))
        }
        other => Ok(other),
    }
}

impl CreateTask {
    pub fn validate(self) -> Result<NewTask, ApiError> {
        Ok(NewTask {
            title: required(self.title, "title")?,
            description: required(self.description, "description")?,
            completed: self.completed.unwrap_or(false),
            category: not_blank(self.category, "category")?
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        })
    }
}

impl UpdateTask {
    pub fn validate(self) -> Result<TaskChanges, ApiError> {
        Ok(TaskChanges {
            title: not_blank(self.title, "title")?,
            description: not_blank(self.description, "description")?,
            completed: self.completed,
            category: not_blank(self.category, "category")?,
        })
    }
}

impl LocalTask {
    pub fn validate(self) -> Result<NewTask, ApiError> {
        Ok(NewTask {
            title: required(Some(self.title), "title")?,
            description: self.description,
            completed: self.status == TaskStatus::Completed,
            category: self.status.category().to_string(),
        })
    }
}
