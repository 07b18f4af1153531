use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::auth::login;
use super::handlers::auth::register;
use super::handlers::health::health;
use super::handlers::projects::create_project;
use super::handlers::projects::delete_project;
use super::handlers::projects::get_project;
use super::handlers::projects::list_project_tasks;
use super::handlers::projects::list_projects;
use super::handlers::projects::update_project;
use super::handlers::tasks::create_task;
use super::handlers::tasks::delete_task;
use super::handlers::tasks::get_task;
use super::handlers::tasks::get_task_stats;
use super::handlers::tasks::list_tasks;
use super::handlers::tasks::reschedule_task;
use super::handlers::tasks::update_task;
use super::handlers::users::get_current_user;
use super::middleware::authenticate;
use crate::domain::project::ports::ProjectServicePort;
use crate::domain::task::ports::TaskServicePort;
use crate::domain::user::ports::UserServicePort;

/// Shared request state.
///
/// Services sit behind their ports so tests can wire in-memory implementations.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub project_service: Arc<dyn ProjectServicePort>,
    pub task_service: Arc<dyn TaskServicePort>,
    pub authenticator: Arc<Authenticator>,
}

pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    project_service: Arc<dyn ProjectServicePort>,
    task_service: Arc<dyn TaskServicePort>,
    authenticator: Arc<Authenticator>,
) -> Router {
    let state = AppState {
        user_service,
        project_service,
        task_service,
        authenticator,
    };

    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login));

    let protected_routes = Router::new()
        .route("/api/users/me", get(get_current_user))
        .route("/api/projects", get(list_projects).post(create_project))
        .route(
            "/api/projects/:project_id",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/api/projects/:project_id/tasks", get(list_project_tasks))
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/stats", get(get_task_stats))
        .route(
            "/api/tasks/:task_id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/api/tasks/:task_id/due-date", patch(reschedule_task))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
