use serde::{Deserialize, Serialize};

/// Category stored for tasks created without one.
pub const DEFAULT_CATEGORY: &str = "to-do";

/// Column a task is rendered in on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    ToDo,
    InProgress,
    Completed,
    WontDo,
}

impl TaskStatus {
    /// Board order.
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::ToDo,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::WontDo,
    ];

    /// Unknown categories (the client sends "none") fall back to `ToDo`.
    pub fn from_category(category: &str) -> Self {
        match category {
            "in-progress" => TaskStatus::InProgress,
            "completed" => TaskStatus::Completed,
            "wont-do" => TaskStatus::WontDo,
            _ => TaskStatus::ToDo,
        }
    }

    /// A completed task is always `Completed`, whatever its category says.
    pub fn from_task(category: &str, completed: bool) -> Self {
        if completed {
            TaskStatus::Completed
        } else {
            Self::from_category(category)
        }
    }

    pub fn category(self) -> &'static str {
        match self {
            TaskStatus::ToDo => "to-do",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
            TaskStatus::WontDo => "wont-do",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            TaskStatus::ToDo => "file",
            TaskStatus::InProgress => "clock",
            TaskStatus::Completed => "check",
            TaskStatus::WontDo => "coffee",
        }
    }
}
