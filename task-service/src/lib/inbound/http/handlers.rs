pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;
pub mod users;

use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use thiserror::Error;

use crate::domain::project::errors::ProjectError;
use crate::domain::project::models::Project;
use crate::domain::task::errors::TaskError;
use crate::domain::task::models::Task;
use crate::domain::task::stats::TaskStats;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::User;

/// Successful response: the given status with `data` as a flat JSON body.
#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize> {
    status: StatusCode,
    data: T,
}

impl<T: Serialize> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        Self { status, data }
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.data)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// JSON request body whose rejections use the `{"error": ...}` shape.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) | UserError::NotFoundByEmail(_) => {
                ApiError::NotFound("User not found".to_string())
            }
            UserError::EmailAlreadyExists(_) => {
                ApiError::BadRequest("User already exists".to_string())
            }
            UserError::InvalidEmail(_) => ApiError::BadRequest("Invalid email format".to_string()),
            UserError::InvalidUserId(_) | UserError::InvalidName(_) => {
                ApiError::BadRequest(err.to_string())
            }
            UserError::PasswordHashing(_) | UserError::DatabaseError(_) | UserError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<ProjectError> for ApiError {
    fn from(err: ProjectError) -> Self {
        match err {
            ProjectError::NotFound(_) => ApiError::NotFound("Project not found".to_string()),
            ProjectError::InvalidProjectId(_) | ProjectError::InvalidName(_) => {
                ApiError::BadRequest(err.to_string())
            }
            ProjectError::DatabaseError(msg) | ProjectError::Unknown(msg) => {
                ApiError::InternalServerError(msg)
            }
        }
    }
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NotFound(_) => ApiError::NotFound("Task not found".to_string()),
            TaskError::ProjectNotFound(_) => ApiError::NotFound("Project not found".to_string()),
            TaskError::InvalidTaskId(_)
            | TaskError::InvalidTitle(_)
            | TaskError::InvalidPriority(_)
            | TaskError::InvalidRecurrence(_)
            | TaskError::InvalidSchedule(_) => ApiError::BadRequest(err.to_string()),
            TaskError::DatabaseError(msg) | TaskError::Unknown(msg) => {
                ApiError::InternalServerError(msg)
            }
        }
    }
}

/// Deserialize a present field (even `null`) as `Some`, so that a missing
/// field stays `None` under `#[serde(default)]`.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Public view of a user; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            name: user.name.as_str().to_string(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectData {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Project> for ProjectData {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id.to_string(),
            name: project.name.as_str().to_string(),
            description: project.description.clone(),
            user_id: project.owner_id.to_string(),
            created_at: project.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskData {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: &'static str,
    pub due_date: Option<DateTime<Utc>>,
    pub project_id: Option<String>,
    pub recurrence: Option<&'static str>,
    pub recurrence_end: Option<DateTime<Utc>>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Task> for TaskData {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.to_string(),
            title: task.title.as_str().to_string(),
            description: task.description.clone(),
            completed: task.completed,
            priority: task.priority.as_str(),
            due_date: task.due_date,
            project_id: task.project_id.map(|id| id.to_string()),
            recurrence: task.recurrence.map(|r| r.as_str()),
            recurrence_end: task.recurrence_end,
            user_id: task.owner_id.to_string(),
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskStatsData {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub by_priority: PriorityCountsData,
    pub by_project: BTreeMap<String, usize>,
    pub completion_rate: f64,
    pub recent_performance: RecentPerformanceData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityCountsData {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentPerformanceData {
    pub completed_last_week: usize,
    pub total_last_week: usize,
}

impl From<&TaskStats> for TaskStatsData {
    fn from(stats: &TaskStats) -> Self {
        Self {
            total: stats.total,
            completed: stats.completed,
            pending: stats.pending,
            by_priority: PriorityCountsData {
                high: stats.by_priority.high,
                medium: stats.by_priority.medium,
                low: stats.by_priority.low,
            },
            by_project: stats
                .by_project
                .iter()
                .map(|(id, count)| (id.to_string(), *count))
                .collect(),
            completion_rate: stats.completion_rate,
            recent_performance: RecentPerformanceData {
                completed_last_week: stats.recent_performance.completed_last_week,
                total_last_week: stats.recent_performance.total_last_week,
            },
        }
    }
}
