use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::project::models::ProjectId;
use crate::domain::task::errors::TaskError;
use crate::domain::task::models::CreateTaskCommand;
use crate::domain::task::models::Task;
use crate::domain::task::models::TaskId;
use crate::domain::task::models::UpdateTaskCommand;
use crate::domain::task::stats::TaskStats;
use crate::domain::user::models::UserId;

/// Port for task domain service operations.
///
/// Like projects, tasks are scoped to `owner` and foreign tasks are reported
/// as `NotFound`.
#[async_trait]
pub trait TaskServicePort: Send + Sync + 'static {
    /// Create a task owned by `owner`.
    ///
    /// # Errors
    /// * `ProjectNotFound` - `project_id` does not reference a project of `owner`
    /// * `InvalidSchedule` - Inconsistent recurrence fields
    async fn create_task(&self, command: CreateTaskCommand, owner: UserId)
        -> Result<Task, TaskError>;

    async fn get_task(&self, id: TaskId, owner: UserId) -> Result<Task, TaskError>;

    /// List all tasks of `owner`, oldest first.
    async fn list_tasks(&self, owner: UserId) -> Result<Vec<Task>, TaskError>;

    /// List the tasks of `owner` filed under one of their projects.
    ///
    /// # Errors
    /// * `ProjectNotFound` - Project does not exist or is not owned by `owner`
    async fn list_project_tasks(
        &self,
        project_id: ProjectId,
        owner: UserId,
    ) -> Result<Vec<Task>, TaskError>;

    /// Apply a partial update to an owned task.
    ///
    /// # Errors
    /// * `NotFound` - Task does not exist or is not owned by `owner`
    /// * `ProjectNotFound` - New `project_id` is not owned by `owner`
    async fn update_task(
        &self,
        id: TaskId,
        owner: UserId,
        command: UpdateTaskCommand,
    ) -> Result<Task, TaskError>;

    /// Move (or clear) the due date of an owned task.
    async fn reschedule_task(
        &self,
        id: TaskId,
        owner: UserId,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Task, TaskError>;

    /// Delete an owned task, returning what was removed.
    async fn delete_task(&self, id: TaskId, owner: UserId) -> Result<Task, TaskError>;

    /// Aggregate statistics over every task of `owner`.
    async fn task_stats(&self, owner: UserId) -> Result<TaskStats, TaskError>;
}

/// Persistence operations for tasks.
#[async_trait]
pub trait TaskRepository: Send + Sync + 'static {
    async fn create(&self, task: Task) -> Result<Task, TaskError>;

    async fn find_owned(&self, id: TaskId, owner: UserId) -> Result<Option<Task>, TaskError>;

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Task>, TaskError>;

    async fn list_by_project(
        &self,
        project_id: ProjectId,
        owner: UserId,
    ) -> Result<Vec<Task>, TaskError>;

    /// # Errors
    /// * `NotFound` - No row matched both id and owner
    async fn update(&self, task: Task) -> Result<Task, TaskError>;

    async fn delete_owned(&self, id: TaskId, owner: UserId) -> Result<Option<Task>, TaskError>;
}
