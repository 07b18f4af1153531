use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::project::errors::ProjectError;
use crate::domain::project::models::Project;
use crate::domain::project::models::ProjectId;
use crate::domain::project::models::ProjectName;
use crate::domain::project::ports::ProjectRepository;
use crate::domain::user::models::UserId;

#[derive(FromRow)]
struct ProjectRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    user_id: Uuid,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = ProjectError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        Ok(Project {
            id: ProjectId(row.id),
            name: ProjectName::new(row.name)?,
            description: row.description,
            owner_id: UserId(row.user_id),
            created_at: row.created_at,
        })
    }
}

pub struct PostgresProjectRepository {
    pool: PgPool,
}

impl PostgresProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn create(&self, project: Project) -> Result<Project, ProjectError> {
        sqlx::query(
            r#"
            INSERT INTO projects (id, name, description, user_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(project.id.0)
        .bind(project.name.as_str())
        .bind(project.description.as_deref())
        .bind(project.owner_id.0)
        .bind(project.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| ProjectError::DatabaseError(e.to_string()))?;

        Ok(project)
    }

    async fn find_owned(
        &self,
        id: ProjectId,
        owner: UserId,
    ) -> Result<Option<Project>, ProjectError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT id, name, description, user_id, created_at
            FROM projects
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.0)
        .bind(owner.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ProjectError::DatabaseError(e.to_string()))?;

        row.map(Project::try_from).transpose()
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Project>, ProjectError> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT id, name, description, user_id, created_at
            FROM projects
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ProjectError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Project::try_from).collect()
    }

    async fn update(&self, project: Project) -> Result<Project, ProjectError> {
        let result = sqlx::query(
            r#"
            UPDATE projects
            SET name = $3, description = $4
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(project.id.0)
        .bind(project.owner_id.0)
        .bind(project.name.as_str())
        .bind(project.description.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|e| ProjectError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(ProjectError::NotFound(project.id));
        }

        Ok(project)
    }

    async fn delete_owned(
        &self,
        id: ProjectId,
        owner: UserId,
    ) -> Result<Option<Project>, ProjectError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            DELETE FROM projects
            WHERE id = $1 AND user_id = $2
            RETURNING id, name, description, user_id, created_at
            "#,
        )
        .bind(id.0)
        .bind(owner.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ProjectError::DatabaseError(e.to_string()))?;

        row.map(Project::try_from).transpose()
    }
}
