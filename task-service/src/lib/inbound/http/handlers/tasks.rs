use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;

use super::deserialize_some;
use super::ApiError;
use super::ApiSuccess;
use super::JsonBody;
use super::TaskData;
use super::TaskStatsData;
use crate::domain::project::models::ProjectId;
use crate::domain::task::errors::TaskError;
use crate::domain::task::models::CreateTaskCommand;
use crate::domain::task::models::Priority;
use crate::domain::task::models::Recurrence;
use crate::domain::task::models::TaskId;
use crate::domain::task::models::TaskTitle;
use crate::domain::task::models::UpdateTaskCommand;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskRequest {
    title: Option<String>,
    description: Option<String>,
    priority: Option<String>,
    due_date: Option<DateTime<Utc>>,
    project_id: Option<String>,
    recurrence: Option<String>,
    recurrence_end: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    fn try_into_command(self) -> Result<CreateTaskCommand, ApiError> {
        let title = self
            .title
            .ok_or_else(|| ApiError::BadRequest("Missing required fields".to_string()))?;

        let command = CreateTaskCommand {
            title: TaskTitle::new(title).map_err(TaskError::from)?,
            description: self.description,
            priority: self
                .priority
                .as_deref()
                .map(str::parse::<Priority>)
                .transpose()
                .map_err(TaskError::from)?,
            due_date: self.due_date,
            project_id: self.project_id.as_deref().map(parse_project_id).transpose()?,
            recurrence: self
                .recurrence
                .as_deref()
                .map(str::parse::<Recurrence>)
                .transpose()
                .map_err(TaskError::from)?,
            recurrence_end: self.recurrence_end,
        };

        Ok(command)
    }
}

/// Every field is optional; `null` clears the nullable ones.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskRequest {
    title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    description: Option<Option<String>>,
    completed: Option<bool>,
    priority: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    due_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    project_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    recurrence: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    recurrence_end: Option<Option<DateTime<Utc>>>,
}

impl UpdateTaskRequest {
    fn try_into_command(self) -> Result<UpdateTaskCommand, ApiError> {
        let project_id = match self.project_id {
            Some(Some(raw)) => Some(Some(parse_project_id(&raw)?)),
            Some(None) => Some(None),
            None => None,
        };

        let recurrence = match self.recurrence {
            Some(Some(raw)) => Some(Some(raw.parse::<Recurrence>().map_err(TaskError::from)?)),
            Some(None) => Some(None),
            None => None,
        };

        Ok(UpdateTaskCommand {
            title: self
                .title
                .map(TaskTitle::new)
                .transpose()
                .map_err(TaskError::from)?,
            description: self.description,
            completed: self.completed,
            priority: self
                .priority
                .as_deref()
                .map(str::parse::<Priority>)
                .transpose()
                .map_err(TaskError::from)?,
            due_date: self.due_date,
            project_id,
            recurrence,
            recurrence_end: self.recurrence_end,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RescheduleTaskRequest {
    #[serde(default, deserialize_with = "deserialize_some")]
    due_date: Option<Option<DateTime<Utc>>>,
}

fn parse_task_id(raw: &str) -> Result<TaskId, ApiError> {
    TaskId::from_string(raw).map_err(|e| ApiError::from(TaskError::from(e)))
}

fn parse_project_id(raw: &str) -> Result<ProjectId, ApiError> {
    ProjectId::from_string(raw)
        .map_err(|e| ApiError::BadRequest(format!("Invalid project ID: {}", e)))
}

pub async fn list_tasks(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
) -> Result<ApiSuccess<Vec<TaskData>>, ApiError> {
    let tasks = state.task_service.list_tasks(caller.user_id).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        tasks.iter().map(TaskData::from).collect(),
    ))
}

pub async fn create_task(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    JsonBody(body): JsonBody<CreateTaskRequest>,
) -> Result<ApiSuccess<TaskData>, ApiError> {
    state
        .task_service
        .create_task(body.try_into_command()?, caller.user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref task| ApiSuccess::new(StatusCode::CREATED, task.into()))
}

pub async fn get_task_stats(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
) -> Result<ApiSuccess<TaskStatsData>, ApiError> {
    state
        .task_service
        .task_stats(caller.user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref stats| ApiSuccess::new(StatusCode::OK, stats.into()))
}

pub async fn get_task(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Path(task_id): Path<String>,
) -> Result<ApiSuccess<TaskData>, ApiError> {
    let task_id = parse_task_id(&task_id)?;

    state
        .task_service
        .get_task(task_id, caller.user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref task| ApiSuccess::new(StatusCode::OK, task.into()))
}

pub async fn update_task(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Path(task_id): Path<String>,
    JsonBody(body): JsonBody<UpdateTaskRequest>,
) -> Result<ApiSuccess<TaskData>, ApiError> {
    let task_id = parse_task_id(&task_id)?;

    state
        .task_service
        .update_task(task_id, caller.user_id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref task| ApiSuccess::new(StatusCode::OK, task.into()))
}

pub async fn reschedule_task(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Path(task_id): Path<String>,
    JsonBody(body): JsonBody<RescheduleTaskRequest>,
) -> Result<ApiSuccess<TaskData>, ApiError> {
    let task_id = parse_task_id(&task_id)?;
    let due_date = body
        .due_date
        .ok_or_else(|| ApiError::BadRequest("Missing required fields".to_string()))?;

    state
        .task_service
        .reschedule_task(task_id, caller.user_id, due_date)
        .await
        .map_err(ApiError::from)
        .map(|ref task| ApiSuccess::new(StatusCode::OK, task.into()))
}

pub async fn delete_task(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Path(task_id): Path<String>,
) -> Result<ApiSuccess<TaskData>, ApiError> {
    let task_id = parse_task_id(&task_id)?;

    state
        .task_service
        .delete_task(task_id, caller.user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref task| ApiSuccess::new(StatusCode::OK, task.into()))
}
