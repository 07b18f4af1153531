use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::errors::ProjectError;
use super::models::CreateProjectCommand;
use super::models::Project;
use super::models::ProjectId;
use super::models::UpdateProjectCommand;
use super::ports::ProjectRepository;
use super::ports::ProjectServicePort;
use crate::domain::user::models::UserId;

/// Concrete implementation of ProjectServicePort.
///
/// Generic over repository for testability.
pub struct ProjectService<PR>
where
    PR: ProjectRepository,
{
    project_repository: Arc<PR>,
}

impl<PR> ProjectService<PR>
where
    PR: ProjectRepository,
{
    pub fn new(project_repository: Arc<PR>) -> Self {
        Self { project_repository }
    }
}

#[async_trait]
impl<PR> ProjectServicePort for ProjectService<PR>
where
    PR: ProjectRepository,
{
    async fn create_project(
        &self,
        command: CreateProjectCommand,
        owner: UserId,
    ) -> Result<Project, ProjectError> {
        let project = Project {
            id: ProjectId::new(),
            name: command.name,
            description: command.description,
            owner_id: owner,
            created_at: Utc::now(),
        };

        self.project_repository.create(project).await
    }

    async fn get_project(&self, id: ProjectId, owner: UserId) -> Result<Project, ProjectError> {
        self.project_repository
            .find_owned(id, owner)
            .await?
            .ok_or(ProjectError::NotFound(id))
    }

    async fn list_projects(&self, owner: UserId) -> Result<Vec<Project>, ProjectError> {
        self.project_repository.list_by_owner(owner).await
    }

    async fn update_project(
        &self,
        id: ProjectId,
        owner: UserId,
        command: UpdateProjectCommand,
    ) -> Result<Project, ProjectError> {
        let mut project = self.get_project(id, owner).await?;

        if let Some(name) = command.name {
            project.name = name;
        }

        if let Some(description) = command.description {
            project.description = description;
        }

        self.project_repository.update(project).await
    }

    async fn delete_project(&self, id: ProjectId, owner: UserId) -> Result<Project, ProjectError> {
        let deleted = self
            .project_repository
            .delete_owned(id, owner)
            .await?
            .ok_or(ProjectError::NotFound(id))?;

        tracing::info!(project_id = %id, owner_id = %owner, "Project deleted");

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use mockall::mock;

    use super::*;
    use crate::domain::project::models::ProjectName;

    mock! {
        pub TestProjectRepository {}

        #[async_trait]
        impl ProjectRepository for TestProjectRepository {
            async fn create(&self, project: Project) -> Result<Project, ProjectError>;
            async fn find_owned(&self, id: ProjectId, owner: UserId) -> Result<Option<Project>, ProjectError>;
            async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Project>, ProjectError>;
            async fn update(&self, project: Project) -> Result<Project, ProjectError>;
            async fn delete_owned(&self, id: ProjectId, owner: UserId) -> Result<Option<Project>, ProjectError>;
        }
    }

    fn project(owner: UserId, name: &str) -> Project {
        Project {
            id: ProjectId::new(),
            name: ProjectName::new(name.to_string()).unwrap(),
            description: Some("Initial description".to_string()),
            owner_id: owner,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_project_sets_owner() {
        let mut repository = MockTestProjectRepository::new();
        let owner = UserId::new();

        repository
            .expect_create()
            .withf(move |project| project.owner_id == owner && project.name.as_str() == "Website")
            .times(1)
            .returning(|project| Ok(project));

        let service = ProjectService::new(Arc::new(repository));

        let command = CreateProjectCommand {
            name: ProjectName::new("Website".to_string()).unwrap(),
            description: None,
        };

        let project = service.create_project(command, owner).await.unwrap();
        assert_eq!(project.owner_id, owner);
        assert!(project.description.is_none());
    }

    #[tokio::test]
    async fn test_get_project_of_other_user_is_not_found() {
        let mut repository = MockTestProjectRepository::new();

        repository
            .expect_find_owned()
            .times(1)
            .returning(|_, _| Ok(None));

        let service = ProjectService::new(Arc::new(repository));

        let id = ProjectId::new();
        let result = service.get_project(id, UserId::new()).await;
        assert!(matches!(result, Err(ProjectError::NotFound(missing)) if missing == id));
    }

    #[tokio::test]
    async fn test_update_project_applies_only_given_fields() {
        let mut repository = MockTestProjectRepository::new();
        let owner = UserId::new();
        let existing = project(owner, "Website");
        let id = existing.id;

        repository
            .expect_find_owned()
            .withf(move |project_id, user_id| *project_id == id && *user_id == owner)
            .times(1)
            .returning(move |_, _| Ok(Some(existing.clone())));
        repository
            .expect_update()
            .withf(|project| {
                project.name.as_str() == "Website v2"
                    && project.description.as_deref() == Some("Initial description")
            })
            .times(1)
            .returning(|project| Ok(project));

        let service = ProjectService::new(Arc::new(repository));

        let command = UpdateProjectCommand {
            name: Some(ProjectName::new("Website v2".to_string()).unwrap()),
            description: None,
        };

        let updated = service.update_project(id, owner, command).await.unwrap();
        assert_eq!(updated.name.as_str(), "Website v2");
    }

    #[tokio::test]
    async fn test_update_project_can_clear_description() {
        let mut repository = MockTestProjectRepository::new();
        let owner = UserId::new();
        let existing = project(owner, "Website");
        let id = existing.id;

        repository
            .expect_find_owned()
            .times(1)
            .returning(move |_, _| Ok(Some(existing.clone())));
        repository
            .expect_update()
            .withf(|project| project.description.is_none())
            .times(1)
            .returning(|project| Ok(project));

        let service = ProjectService::new(Arc::new(repository));

        let command = UpdateProjectCommand {
            name: None,
            description: Some(None),
        };

        assert!(service.update_project(id, owner, command).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_project_not_owned_never_writes() {
        let mut repository = MockTestProjectRepository::new();

        repository
            .expect_find_owned()
            .times(1)
            .returning(|_, _| Ok(None));
        repository.expect_update().times(0);

        let service = ProjectService::new(Arc::new(repository));

        let result = service
            .update_project(ProjectId::new(), UserId::new(), UpdateProjectCommand::default())
            .await;
        assert!(matches!(result, Err(ProjectError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_project_not_owned() {
        let mut repository = MockTestProjectRepository::new();

        repository
            .expect_delete_owned()
            .times(1)
            .returning(|_, _| Ok(None));

        let service = ProjectService::new(Arc::new(repository));

        let result = service.delete_project(ProjectId::new(), UserId::new()).await;
        assert!(matches!(result, Err(ProjectError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_projects_delegates_to_owner_scope() {
        let mut repository = MockTestProjectRepository::new();
        let owner = UserId::new();
        let owned = vec![project(owner, "One"), project(owner, "Two")];

        repository
            .expect_list_by_owner()
            .withf(move |user_id| *user_id == owner)
            .times(1)
            .returning(move |_| Ok(owned.clone()));

        let service = ProjectService::new(Arc::new(repository));

        let projects = service.list_projects(owner).await.unwrap();
        assert_eq!(projects.len(), 2);
    }
}
