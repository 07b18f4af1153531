use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::deserialize_some;
use super::ApiError;
use super::ApiSuccess;
use super::JsonBody;
use super::ProjectData;
use super::TaskData;
use crate::domain::project::errors::ProjectError;
use crate::domain::project::models::CreateProjectCommand;
use crate::domain::project::models::ProjectId;
use crate::domain::project::models::ProjectName;
use crate::domain::project::models::UpdateProjectCommand;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectRequest {
    name: Option<String>,
    description: Option<String>,
}

impl CreateProjectRequest {
    fn try_into_command(self) -> Result<CreateProjectCommand, ApiError> {
        let name = self
            .name
            .ok_or_else(|| ApiError::BadRequest("Missing required fields".to_string()))?;

        Ok(CreateProjectCommand {
            name: ProjectName::new(name).map_err(ProjectError::from)?,
            description: self.description,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProjectRequest {
    name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    description: Option<Option<String>>,
}

impl UpdateProjectRequest {
    fn try_into_command(self) -> Result<UpdateProjectCommand, ProjectError> {
        Ok(UpdateProjectCommand {
            name: self.name.map(ProjectName::new).transpose()?,
            description: self.description,
        })
    }
}

fn parse_project_id(raw: &str) -> Result<ProjectId, ApiError> {
    ProjectId::from_string(raw).map_err(|e| ApiError::from(ProjectError::from(e)))
}

pub async fn list_projects(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
) -> Result<ApiSuccess<Vec<ProjectData>>, ApiError> {
    let projects = state.project_service.list_projects(caller.user_id).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        projects.iter().map(ProjectData::from).collect(),
    ))
}

pub async fn create_project(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    JsonBody(body): JsonBody<CreateProjectRequest>,
) -> Result<ApiSuccess<ProjectData>, ApiError> {
    state
        .project_service
        .create_project(body.try_into_command()?, caller.user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref project| ApiSuccess::new(StatusCode::CREATED, project.into()))
}

pub async fn get_project(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Path(project_id): Path<String>,
) -> Result<ApiSuccess<ProjectData>, ApiError> {
    let project_id = parse_project_id(&project_id)?;

    state
        .project_service
        .get_project(project_id, caller.user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref project| ApiSuccess::new(StatusCode::OK, project.into()))
}

pub async fn update_project(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Path(project_id): Path<String>,
    JsonBody(body): JsonBody<UpdateProjectRequest>,
) -> Result<ApiSuccess<ProjectData>, ApiError> {
    let project_id = parse_project_id(&project_id)?;

    state
        .project_service
        .update_project(project_id, caller.user_id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref project| ApiSuccess::new(StatusCode::OK, project.into()))
}

pub async fn delete_project(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Path(project_id): Path<String>,
) -> Result<ApiSuccess<ProjectData>, ApiError> {
    let project_id = parse_project_id(&project_id)?;

    state
        .project_service
        .delete_project(project_id, caller.user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref project| ApiSuccess::new(StatusCode::OK, project.into()))
}

pub async fn list_project_tasks(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Path(project_id): Path<String>,
) -> Result<ApiSuccess<Vec<TaskData>>, ApiError> {
    let project_id = parse_project_id(&project_id)?;

    let tasks = state
        .task_service
        .list_project_tasks(project_id, caller.user_id)
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        tasks.iter().map(TaskData::from).collect(),
    ))
}
