use async_trait::async_trait;

use crate::domain::project::errors::ProjectError;
use crate::domain::project::models::CreateProjectCommand;
use crate::domain::project::models::Project;
use crate::domain::project::models::ProjectId;
use crate::domain::project::models::UpdateProjectCommand;
use crate::domain::user::models::UserId;

/// Port for project domain service operations.
///
/// Every operation is scoped to `owner`; projects belonging to other users
/// behave exactly like projects that do not exist.
#[async_trait]
pub trait ProjectServicePort: Send + Sync + 'static {
    /// Create a project owned by `owner`.
    async fn create_project(
        &self,
        command: CreateProjectCommand,
        owner: UserId,
    ) -> Result<Project, ProjectError>;

    /// Retrieve one owned project.
    ///
    /// # Errors
    /// * `NotFound` - Project does not exist or is not owned by `owner`
    async fn get_project(&self, id: ProjectId, owner: UserId) -> Result<Project, ProjectError>;

    /// List the projects of `owner`, newest first.
    async fn list_projects(&self, owner: UserId) -> Result<Vec<Project>, ProjectError>;

    /// Apply a partial update to an owned project.
    ///
    /// # Errors
    /// * `NotFound` - Project does not exist or is not owned by `owner`
    async fn update_project(
        &self,
        id: ProjectId,
        owner: UserId,
        command: UpdateProjectCommand,
    ) -> Result<Project, ProjectError>;

    /// Delete an owned project, returning what was removed.
    ///
    /// # Errors
    /// * `NotFound` - Project does not exist or is not owned by `owner`
    async fn delete_project(&self, id: ProjectId, owner: UserId) -> Result<Project, ProjectError>;
}

/// Persistence operations for projects.
#[async_trait]
pub trait ProjectRepository: Send + Sync + 'static {
    async fn create(&self, project: Project) -> Result<Project, ProjectError>;

    /// Retrieve a project only if it belongs to `owner`.
    async fn find_owned(
        &self,
        id: ProjectId,
        owner: UserId,
    ) -> Result<Option<Project>, ProjectError>;

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Project>, ProjectError>;

    /// Persist changed fields of a project, matching on both id and owner.
    ///
    /// # Errors
    /// * `NotFound` - No row matched
    async fn update(&self, project: Project) -> Result<Project, ProjectError>;

    /// Remove a project owned by `owner`.
    ///
    /// # Returns
    /// The deleted project, or None if no row matched
    async fn delete_owned(
        &self,
        id: ProjectId,
        owner: UserId,
    ) -> Result<Option<Project>, ProjectError>;
}
