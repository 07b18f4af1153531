use std::collections::HashMap;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::StatusCode;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use task_service::domain::project::errors::ProjectError;
use task_service::domain::project::models::Project;
use task_service::domain::project::models::ProjectId;
use task_service::domain::project::ports::ProjectRepository;
use task_service::domain::project::service::ProjectService;
use task_service::domain::task::errors::TaskError;
use task_service::domain::task::models::Task;
use task_service::domain::task::models::TaskId;
use task_service::domain::task::ports::TaskRepository;
use task_service::domain::task::service::TaskService;
use task_service::domain::user::errors::UserError;
use task_service::domain::user::models::EmailAddress;
use task_service::domain::user::models::User;
use task_service::domain::user::models::UserId;
use task_service::domain::user::ports::UserRepository;
use task_service::domain::user::service::UserService;
use task_service::inbound::http::router::create_router;
use tower::ServiceExt;

pub const TEST_SECRET: &[u8] = b"integration-test-secret-at-least-32-bytes";

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|existing| existing.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|user| &user.email == email)
            .cloned())
    }
}

#[derive(Default)]
pub struct InMemoryProjectRepository {
    projects: Mutex<HashMap<ProjectId, Project>>,
    /// Shared with the task repository to clear `project_id` on delete.
    tasks: Arc<Mutex<HashMap<TaskId, Task>>>,
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn create(&self, project: Project) -> Result<Project, ProjectError> {
        self.projects
            .lock()
            .unwrap()
            .insert(project.id, project.clone());
        Ok(project)
    }

    async fn find_owned(
        &self,
        id: ProjectId,
        owner: UserId,
    ) -> Result<Option<Project>, ProjectError> {
        Ok(self
            .projects
            .lock()
            .unwrap()
            .get(&id)
            .filter(|project| project.owner_id == owner)
            .cloned())
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Project>, ProjectError> {
        let mut projects: Vec<Project> = self
            .projects
            .lock()
            .unwrap()
            .values()
            .filter(|project| project.owner_id == owner)
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn update(&self, project: Project) -> Result<Project, ProjectError> {
        let mut projects = self.projects.lock().unwrap();
        let owned = projects
            .get(&project.id)
            .is_some_and(|existing| existing.owner_id == project.owner_id);
        if !owned {
            return Err(ProjectError::NotFound(project.id));
        }

        projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn delete_owned(
        &self,
        id: ProjectId,
        owner: UserId,
    ) -> Result<Option<Project>, ProjectError> {
        let mut projects = self.projects.lock().unwrap();
        if !projects.get(&id).is_some_and(|p| p.owner_id == owner) {
            return Ok(None);
        }

        for task in self.tasks.lock().unwrap().values_mut() {
            if task.project_id == Some(id) {
                task.project_id = None;
            }
        }

        Ok(projects.remove(&id))
    }
}

/// Task store that counts every call, so tests can prove a rejected request
/// never reached persistence.
#[derive(Default)]
pub struct InMemoryTaskRepository {
    tasks: Arc<Mutex<HashMap<TaskId, Task>>>,
    calls: AtomicUsize,
}

impl InMemoryTaskRepository {
    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn owned_sorted(&self, keep: impl Fn(&Task) -> bool) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .tasks
            .lock()
            .unwrap()
            .values()
            .filter(|task| keep(task))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        tasks
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, task: Task) -> Result<Task, TaskError> {
        self.touch();
        self.tasks.lock().unwrap().insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_owned(&self, id: TaskId, owner: UserId) -> Result<Option<Task>, TaskError> {
        self.touch();
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .get(&id)
            .filter(|task| task.owner_id == owner)
            .cloned())
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Task>, TaskError> {
        self.touch();
        Ok(self.owned_sorted(|task| task.owner_id == owner))
    }

    async fn list_by_project(
        &self,
        project_id: ProjectId,
        owner: UserId,
    ) -> Result<Vec<Task>, TaskError> {
        self.touch();
        Ok(self.owned_sorted(|task| {
            task.owner_id == owner && task.project_id == Some(project_id)
        }))
    }

    async fn update(&self, task: Task) -> Result<Task, TaskError> {
        self.touch();
        let mut tasks = self.tasks.lock().unwrap();
        let owned = tasks
            .get(&task.id)
            .is_some_and(|existing| existing.owner_id == task.owner_id);
        if !owned {
            return Err(TaskError::NotFound(task.id));
        }

        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn delete_owned(&self, id: TaskId, owner: UserId) -> Result<Option<Task>, TaskError> {
        self.touch();
        let mut tasks = self.tasks.lock().unwrap();
        if !tasks.get(&id).is_some_and(|task| task.owner_id == owner) {
            return Ok(None);
        }
        Ok(tasks.remove(&id))
    }
}

/// Router wired to real domain services over in-memory storage.
pub struct TestApp {
    pub router: Router,
    pub task_repository: Arc<InMemoryTaskRepository>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Registered user with a valid token.
pub struct TestUser {
    pub id: String,
    pub token: String,
}

impl TestApp {
    pub fn new() -> Self {
        let shared_tasks = Arc::new(Mutex::new(HashMap::new()));

        let user_repository = Arc::new(InMemoryUserRepository::default());
        let project_repository = Arc::new(InMemoryProjectRepository {
            projects: Mutex::new(HashMap::new()),
            tasks: Arc::clone(&shared_tasks),
        });
        let task_repository = Arc::new(InMemoryTaskRepository {
            tasks: shared_tasks,
            calls: AtomicUsize::new(0),
        });

        let router = create_router(
            Arc::new(UserService::new(user_repository)),
            Arc::new(ProjectService::new(Arc::clone(&project_repository))),
            Arc::new(TaskService::new(
                Arc::clone(&task_repository),
                project_repository,
            )),
            Arc::new(Authenticator::new(TEST_SECRET)),
        );

        Self {
            router,
            task_repository,
        }
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request("GET", uri, None, token).await
    }

    pub async fn post(&self, uri: &str, body: Value, token: Option<&str>) -> TestResponse {
        self.request("POST", uri, Some(body), token).await
    }

    pub async fn register(&self, email: &str, password: &str, name: &str) -> TestUser {
        let response = self
            .post(
                "/api/auth/register",
                serde_json::json!({ "email": email, "password": password, "name": name }),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);

        TestUser {
            id: response.body["user"]["id"].as_str().unwrap().to_string(),
            token: response.body["token"].as_str().unwrap().to_string(),
        }
    }
}
