use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::project::models::ProjectId;
use crate::domain::task::errors::TaskError;
use crate::domain::task::models::Priority;
use crate::domain::task::models::Recurrence;
use crate::domain::task::models::Task;
use crate::domain::task::models::TaskId;
use crate::domain::task::models::TaskTitle;
use crate::domain::task::ports::TaskRepository;
use crate::domain::user::models::UserId;

const TASK_COLUMNS: &str = "id, title, description, completed, priority, due_date, project_id, \
     recurrence, recurrence_end, user_id, created_at, updated_at";

#[derive(FromRow)]
struct TaskRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    completed: bool,
    priority: String,
    due_date: Option<DateTime<Utc>>,
    project_id: Option<Uuid>,
    recurrence: Option<String>,
    recurrence_end: Option<DateTime<Utc>>,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = TaskError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Task {
            id: TaskId(row.id),
            title: TaskTitle::new(row.title)?,
            description: row.description,
            completed: row.completed,
            priority: row.priority.parse::<Priority>()?,
            due_date: row.due_date,
            project_id: row.project_id.map(ProjectId),
            recurrence: row
                .recurrence
                .as_deref()
                .map(str::parse::<Recurrence>)
                .transpose()?,
            recurrence_end: row.recurrence_end,
            owner_id: UserId(row.user_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_many(
        &self,
        query: &str,
        owner: UserId,
        project: Option<ProjectId>,
    ) -> Result<Vec<Task>, TaskError> {
        let mut statement = sqlx::query_as::<_, TaskRow>(query).bind(owner.0);
        if let Some(project_id) = project {
            statement = statement.bind(project_id.0);
        }

        let rows = statement
            .fetch_all(&self.pool)
            .await
            .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Task::try_from).collect()
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn create(&self, task: Task) -> Result<Task, TaskError> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, title, description, completed, priority, due_date, project_id,
                               recurrence, recurrence_end, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(task.id.0)
        .bind(task.title.as_str())
        .bind(task.description.as_deref())
        .bind(task.completed)
        .bind(task.priority.as_str())
        .bind(task.due_date)
        .bind(task.project_id.map(|id| id.0))
        .bind(task.recurrence.map(|r| r.as_str()))
        .bind(task.recurrence_end)
        .bind(task.owner_id.0)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        Ok(task)
    }

    async fn find_owned(&self, id: TaskId, owner: UserId) -> Result<Option<Task>, TaskError> {
        let query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2");

        let row = sqlx::query_as::<_, TaskRow>(&query)
            .bind(id.0)
            .bind(owner.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        row.map(Task::try_from).transpose()
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Task>, TaskError> {
        let query =
            format!("SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1 ORDER BY created_at ASC");

        self.fetch_many(&query, owner, None).await
    }

    async fn list_by_project(
        &self,
        project_id: ProjectId,
        owner: UserId,
    ) -> Result<Vec<Task>, TaskError> {
        let query = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1 AND project_id = $2 \
             ORDER BY created_at ASC"
        );

        self.fetch_many(&query, owner, Some(project_id)).await
    }

    async fn update(&self, task: Task) -> Result<Task, TaskError> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET title = $3, description = $4, completed = $5, priority = $6, due_date = $7,
                project_id = $8, recurrence = $9, recurrence_end = $10, updated_at = $11
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(task.id.0)
        .bind(task.owner_id.0)
        .bind(task.title.as_str())
        .bind(task.description.as_deref())
        .bind(task.completed)
        .bind(task.priority.as_str())
        .bind(task.due_date)
        .bind(task.project_id.map(|id| id.0))
        .bind(task.recurrence.map(|r| r.as_str()))
        .bind(task.recurrence_end)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(TaskError::NotFound(task.id));
        }

        Ok(task)
    }

    async fn delete_owned(&self, id: TaskId, owner: UserId) -> Result<Option<Task>, TaskError> {
        let query =
            format!("DELETE FROM tasks WHERE id = $1 AND user_id = $2 RETURNING {TASK_COLUMNS}");

        let row = sqlx::query_as::<_, TaskRow>(&query)
            .bind(id.0)
            .bind(owner.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        row.map(Task::try_from).transpose()
    }
}
