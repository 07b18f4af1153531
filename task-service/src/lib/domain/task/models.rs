use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::project::models::ProjectId;
use crate::domain::task::errors::PriorityError;
use crate::domain::task::errors::RecurrenceError;
use crate::domain::task::errors::TaskError;
use crate::domain::task::errors::TaskIdError;
use crate::domain::task::errors::TaskTitleError;
use crate::domain::user::models::UserId;

/// Task unique identifier value object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub Uuid);

impl TaskId {
    /// Generate a new random task ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a task ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, TaskIdError> {
        Uuid::parse_str(s)
            .map(TaskId)
            .map_err(|e| TaskIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Task title value object: non-blank, at most 200 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTitle(String);

impl TaskTitle {
    const MAX_LENGTH: usize = 200;

    pub fn new(title: String) -> Result<Self, TaskTitleError> {
        let title = title.trim().to_string();
        let length = title.chars().count();

        if length == 0 {
            Err(TaskTitleError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(TaskTitleError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(title))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = PriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(PriorityError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurrence {
    Daily,
    Weekly,
    Monthly,
}

impl Recurrence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
        }
    }
}

impl FromStr for Recurrence {
    type Err = RecurrenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Recurrence::Daily),
            "weekly" => Ok(Recurrence::Weekly),
            "monthly" => Ok(Recurrence::Monthly),
            other => Err(RecurrenceError(other.to_string())),
        }
    }
}

/// Task owned by a single user, optionally filed under one of their projects.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    pub title: TaskTitle,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub project_id: Option<ProjectId>,
    pub recurrence: Option<Recurrence>,
    pub recurrence_end: Option<DateTime<Utc>>,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Check the recurrence fields agree with each other.
    ///
    /// # Errors
    /// * `InvalidSchedule` - `recurrence_end` without a recurrence, or before the due date
    pub fn validate_schedule(&self) -> Result<(), TaskError> {
        match (self.recurrence, self.recurrence_end) {
            (None, Some(_)) => Err(TaskError::InvalidSchedule(
                "recurrence_end requires a recurrence".to_string(),
            )),
            (Some(_), Some(end)) if self.due_date.is_some_and(|due| end < due) => Err(
                TaskError::InvalidSchedule("recurrence_end is before due_date".to_string()),
            ),
            _ => Ok(()),
        }
    }
}

/// Command to create a task for the calling user.
#[derive(Debug)]
pub struct CreateTaskCommand {
    pub title: TaskTitle,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<DateTime<Utc>>,
    pub project_id: Option<ProjectId>,
    pub recurrence: Option<Recurrence>,
    pub recurrence_end: Option<DateTime<Utc>>,
}

/// Partial update; only provided fields change.
///
/// Nested options distinguish "leave as is" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Default)]
pub struct UpdateTaskCommand {
    pub title: Option<TaskTitle>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub project_id: Option<Option<ProjectId>>,
    pub recurrence: Option<Option<Recurrence>>,
    pub recurrence_end: Option<Option<DateTime<Utc>>>,
}
