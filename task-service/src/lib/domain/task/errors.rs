use thiserror::Error;

use crate::domain::project::models::ProjectId;
use crate::domain::task::models::TaskId;

/// Error for TaskId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for TaskTitle validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskTitleError {
    #[error("Title must not be empty")]
    Empty,

    #[error("Title too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown priority '{0}' (expected low, medium or high)")]
pub struct PriorityError(pub String);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown recurrence '{0}' (expected daily, weekly or monthly)")]
pub struct RecurrenceError(pub String);

/// Top-level error for all task-related operations
#[derive(Debug, Clone, Error)]
pub enum TaskError {
    #[error("Invalid task ID: {0}")]
    InvalidTaskId(#[from] TaskIdError),

    #[error("Invalid title: {0}")]
    InvalidTitle(#[from] TaskTitleError),

    #[error("Invalid priority: {0}")]
    InvalidPriority(#[from] PriorityError),

    #[error("Invalid recurrence: {0}")]
    InvalidRecurrence(#[from] RecurrenceError),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    /// Also returned when the task exists but belongs to someone else.
    #[error("Task not found: {0}")]
    NotFound(TaskId),

    /// Referenced project is missing or owned by someone else.
    #[error("Project not found: {0}")]
    ProjectNotFound(ProjectId),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
