use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use super::errors::TaskError;
use super::models::CreateTaskCommand;
use super::models::Task;
use super::models::TaskId;
use super::models::UpdateTaskCommand;
use super::ports::TaskRepository;
use super::ports::TaskServicePort;
use super::stats::TaskStats;
use crate::domain::project::models::ProjectId;
use crate::domain::project::ports::ProjectRepository;
use crate::domain::user::models::UserId;

/// Concrete implementation of TaskServicePort.
///
/// Holds the project repository as well so that a task can only be filed
/// under a project of the same owner.
pub struct TaskService<TR, PR>
where
    TR: TaskRepository,
    PR: ProjectRepository,
{
    task_repository: Arc<TR>,
    project_repository: Arc<PR>,
}

impl<TR, PR> TaskService<TR, PR>
where
    TR: TaskRepository,
    PR: ProjectRepository,
{
    pub fn new(task_repository: Arc<TR>, project_repository: Arc<PR>) -> Self {
        Self {
            task_repository,
            project_repository,
        }
    }

    async fn ensure_project_owned(
        &self,
        project_id: ProjectId,
        owner: UserId,
    ) -> Result<(), TaskError> {
        self.project_repository
            .find_owned(project_id, owner)
            .await
            .map_err(|e| TaskError::DatabaseError(e.to_string()))?
            .map(|_| ())
            .ok_or(TaskError::ProjectNotFound(project_id))
    }
}

#[async_trait]
impl<TR, PR> TaskServicePort for TaskService<TR, PR>
where
    TR: TaskRepository,
    PR: ProjectRepository,
{
    async fn create_task(
        &self,
        command: CreateTaskCommand,
        owner: UserId,
    ) -> Result<Task, TaskError> {
        if let Some(project_id) = command.project_id {
            self.ensure_project_owned(project_id, owner).await?;
        }

        let now = Utc::now();
        let task = Task {
            id: TaskId::new(),
            title: command.title,
            description: command.description,
            completed: false,
            priority: command.priority.unwrap_or_default(),
            due_date: command.due_date,
            project_id: command.project_id,
            recurrence: command.recurrence,
            recurrence_end: command.recurrence_end,
            owner_id: owner,
            created_at: now,
            updated_at: now,
        };
        task.validate_schedule()?;

        self.task_repository.create(task).await
    }

    async fn get_task(&self, id: TaskId, owner: UserId) -> Result<Task, TaskError> {
        self.task_repository
            .find_owned(id, owner)
            .await?
            .ok_or(TaskError::NotFound(id))
    }

    async fn list_tasks(&self, owner: UserId) -> Result<Vec<Task>, TaskError> {
        self.task_repository.list_by_owner(owner).await
    }

    async fn list_project_tasks(
        &self,
        project_id: ProjectId,
        owner: UserId,
    ) -> Result<Vec<Task>, TaskError> {
        self.ensure_project_owned(project_id, owner).await?;
        self.task_repository.list_by_project(project_id, owner).await
    }

    async fn update_task(
        &self,
        id: TaskId,
        owner: UserId,
        command: UpdateTaskCommand,
    ) -> Result<Task, TaskError> {
        let mut task = self.get_task(id, owner).await?;

        if let Some(Some(project_id)) = command.project_id {
            self.ensure_project_owned(project_id, owner).await?;
        }

        if let Some(title) = command.title {
            task.title = title;
        }
        if let Some(description) = command.description {
            task.description = description;
        }
        if let Some(completed) = command.completed {
            task.completed = completed;
        }
        if let Some(priority) = command.priority {
            task.priority = priority;
        }
        if let Some(due_date) = command.due_date {
            task.due_date = due_date;
        }
        if let Some(project_id) = command.project_id {
            task.project_id = project_id;
        }
        if let Some(recurrence) = command.recurrence {
            task.recurrence = recurrence;
        }
        if let Some(recurrence_end) = command.recurrence_end {
            task.recurrence_end = recurrence_end;
        }

        task.validate_schedule()?;
        task.updated_at = Utc::now();

        self.task_repository.update(task).await
    }

    async fn reschedule_task(
        &self,
        id: TaskId,
        owner: UserId,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Task, TaskError> {
        let command = UpdateTaskCommand {
            due_date: Some(due_date),
            ..Default::default()
        };

        self.update_task(id, owner, command).await
    }

    async fn delete_task(&self, id: TaskId, owner: UserId) -> Result<Task, TaskError> {
        let deleted = self
            .task_repository
            .delete_owned(id, owner)
            .await?
            .ok_or(TaskError::NotFound(id))?;

        tracing::info!(task_id = %id, owner_id = %owner, "Task deleted");

        Ok(deleted)
    }

    async fn task_stats(&self, owner: UserId) -> Result<TaskStats, TaskError> {
        let tasks = self.task_repository.list_by_owner(owner).await?;
        Ok(TaskStats::compute(&tasks, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Duration;
    use mockall::mock;

    use super::*;
    use crate::domain::project::errors::ProjectError;
    use crate::domain::project::models::Project;
    use crate::domain::project::models::ProjectName;
    use crate::domain::task::models::Priority;
    use crate::domain::task::models::Recurrence;
    use crate::domain::task::models::TaskTitle;

    mock! {
        pub TestTaskRepository {}

        #[async_trait]
        impl TaskRepository for TestTaskRepository {
            async fn create(&self, task: Task) -> Result<Task, TaskError>;
            async fn find_owned(&self, id: TaskId, owner: UserId) -> Result<Option<Task>, TaskError>;
            async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Task>, TaskError>;
            async fn list_by_project(&self, project_id: ProjectId, owner: UserId) -> Result<Vec<Task>, TaskError>;
            async fn update(&self, task: Task) -> Result<Task, TaskError>;
            async fn delete_owned(&self, id: TaskId, owner: UserId) -> Result<Option<Task>, TaskError>;
        }
    }

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

    fn title(value: &str) -> TaskTitle {
        TaskTitle::new(value.to_string()).unwrap()
    }

    fn create_command(value: &str) -> CreateTaskCommand {
        CreateTaskCommand {
            title: title(value),
            description: None,
            priority: None,
            due_date: None,
            project_id: None,
            recurrence: None,
            recurrence_end: None,
        }
    }

    fn existing_task(owner: UserId) -> Task {
        let created = Utc::now() - Duration::hours(1);
        Task {
            id: TaskId::new(),
            title: title("Existing"),
            description: Some("notes".to_string()),
            completed: false,
            priority: Priority::Low,
            due_date: None,
            project_id: None,
            recurrence: None,
            recurrence_end: None,
            owner_id: owner,
            created_at: created,
            updated_at: created,
        }
    }

    fn owned_project(id: ProjectId, owner: UserId) -> Project {
        Project {
            id,
            name: ProjectName::new("Home".to_string()).unwrap(),
            description: None,
            owner_id: owner,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_task_defaults() {
        let mut tasks = MockTestTaskRepository::new();
        let projects = MockTestProjectRepository::new();
        let owner = UserId::new();

        tasks
            .expect_create()
            .withf(move |task| {
                task.owner_id == owner
                    && !task.completed
                    && task.priority == Priority::Medium
                    && task.created_at == task.updated_at
            })
            .times(1)
            .returning(|task| Ok(task));

        let service = TaskService::new(Arc::new(tasks), Arc::new(projects));

        let task = service
            .create_task(create_command("Buy milk"), owner)
            .await
            .unwrap();
        assert_eq!(task.title.as_str(), "Buy milk");
    }

    #[tokio::test]
    async fn test_create_task_in_foreign_project_is_rejected() {
        let mut tasks = MockTestTaskRepository::new();
        let mut projects = MockTestProjectRepository::new();
        let project_id = ProjectId::new();

        projects
            .expect_find_owned()
            .times(1)
            .returning(|_, _| Ok(None));
        tasks.expect_create().times(0);

        let service = TaskService::new(Arc::new(tasks), Arc::new(projects));

        let command = CreateTaskCommand {
            project_id: Some(project_id),
            ..create_command("Sneaky")
        };
        let result = service.create_task(command, UserId::new()).await;
        assert!(matches!(result, Err(TaskError::ProjectNotFound(id)) if id == project_id));
    }

    #[tokio::test]
    async fn test_create_task_in_owned_project() {
        let mut tasks = MockTestTaskRepository::new();
        let mut projects = MockTestProjectRepository::new();
        let owner = UserId::new();
        let project_id = ProjectId::new();

        projects
            .expect_find_owned()
            .withf(move |id, user| *id == project_id && *user == owner)
            .times(1)
            .returning(move |id, user| Ok(Some(owned_project(id, user))));
        tasks
            .expect_create()
            .withf(move |task| task.project_id == Some(project_id))
            .times(1)
            .returning(|task| Ok(task));

        let service = TaskService::new(Arc::new(tasks), Arc::new(projects));

        let command = CreateTaskCommand {
            project_id: Some(project_id),
            ..create_command("Paint fence")
        };
        assert!(service.create_task(command, owner).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_task_with_invalid_schedule() {
        let mut tasks = MockTestTaskRepository::new();
        let projects = MockTestProjectRepository::new();
        tasks.expect_create().times(0);

        let service = TaskService::new(Arc::new(tasks), Arc::new(projects));

        let command = CreateTaskCommand {
            recurrence_end: Some(Utc::now()),
            ..create_command("Orphan end")
        };
        let result = service.create_task(command, UserId::new()).await;
        assert!(matches!(result, Err(TaskError::InvalidSchedule(_))));
    }

    #[tokio::test]
    async fn test_update_task_bumps_updated_at() {
        let mut tasks = MockTestTaskRepository::new();
        let projects = MockTestProjectRepository::new();
        let owner = UserId::new();
        let existing = existing_task(owner);
        let id = existing.id;
        let previous = existing.updated_at;

        tasks
            .expect_find_owned()
            .times(1)
            .returning(move |_, _| Ok(Some(existing.clone())));
        tasks
            .expect_update()
            .withf(move |task| {
                task.completed
                    && task.priority == Priority::Low
                    && task.description.is_none()
                    && task.updated_at > previous
            })
            .times(1)
            .returning(|task| Ok(task));

        let service = TaskService::new(Arc::new(tasks), Arc::new(projects));

        let command = UpdateTaskCommand {
            completed: Some(true),
            description: Some(None),
            ..Default::default()
        };
        let updated = service.update_task(id, owner, command).await.unwrap();
        assert!(updated.completed);
    }

    #[tokio::test]
    async fn test_update_task_not_owned() {
        let mut tasks = MockTestTaskRepository::new();
        let projects = MockTestProjectRepository::new();

        tasks
            .expect_find_owned()
            .times(1)
            .returning(|_, _| Ok(None));
        tasks.expect_update().times(0);

        let service = TaskService::new(Arc::new(tasks), Arc::new(projects));

        let result = service
            .update_task(TaskId::new(), UserId::new(), UpdateTaskCommand::default())
            .await;
        assert!(matches!(result, Err(TaskError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_reschedule_task_sets_due_date() {
        let mut tasks = MockTestTaskRepository::new();
        let projects = MockTestProjectRepository::new();
        let owner = UserId::new();
        let mut existing = existing_task(owner);
        existing.recurrence = Some(Recurrence::Weekly);
        let id = existing.id;
        let due = Utc::now() + Duration::days(3);

        tasks
            .expect_find_owned()
            .times(1)
            .returning(move |_, _| Ok(Some(existing.clone())));
        tasks
            .expect_update()
            .withf(move |task| task.due_date == Some(due) && task.title.as_str() == "Existing")
            .times(1)
            .returning(|task| Ok(task));

        let service = TaskService::new(Arc::new(tasks), Arc::new(projects));

        let task = service.reschedule_task(id, owner, Some(due)).await.unwrap();
        assert_eq!(task.due_date, Some(due));
    }

    #[tokio::test]
    async fn test_list_project_tasks_requires_owned_project() {
        let mut tasks = MockTestTaskRepository::new();
        let mut projects = MockTestProjectRepository::new();

        projects
            .expect_find_owned()
            .times(1)
            .returning(|_, _| Ok(None));
        tasks.expect_list_by_project().times(0);

        let service = TaskService::new(Arc::new(tasks), Arc::new(projects));

        let result = service
            .list_project_tasks(ProjectId::new(), UserId::new())
            .await;
        assert!(matches!(result, Err(TaskError::ProjectNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_task_not_owned() {
        let mut tasks = MockTestTaskRepository::new();
        let projects = MockTestProjectRepository::new();

        tasks
            .expect_delete_owned()
            .times(1)
            .returning(|_, _| Ok(None));

        let service = TaskService::new(Arc::new(tasks), Arc::new(projects));

        let result = service.delete_task(TaskId::new(), UserId::new()).await;
        assert!(matches!(result, Err(TaskError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_task_stats_over_owner_tasks() {
        let mut tasks = MockTestTaskRepository::new();
        let projects = MockTestProjectRepository::new();
        let owner = UserId::new();
        let mut done = existing_task(owner);
        done.completed = true;
        let open = existing_task(owner);

        tasks
            .expect_list_by_owner()
            .withf(move |user| *user == owner)
            .times(1)
            .returning(move |_| Ok(vec![done.clone(), open.clone()]));

        let service = TaskService::new(Arc::new(tasks), Arc::new(projects));

        let stats = service.task_stats(owner).await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.completion_rate, 50.0);
    }
}
