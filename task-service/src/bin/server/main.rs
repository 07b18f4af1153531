use std::sync::Arc;

use auth::Authenticator;
use sqlx::postgres::PgPoolOptions;
use task_service::config::Config;
use task_service::domain::project::service::ProjectService;
use task_service::domain::task::service::TaskService;
use task_service::domain::user::service::UserService;
use task_service::inbound::http::router::create_router;
use task_service::outbound::repositories::PostgresProjectRepository;
use task_service::outbound::repositories::PostgresTaskRepository;
use task_service::outbound::repositories::PostgresUserRepository;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "task_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "task-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        max_connections = config.database.max_connections,
        jwt_expiration_hours = config.jwt.expiration_hours,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let authenticator = Arc::new(
        Authenticator::new(config.jwt.secret.as_bytes())
            .with_token_lifetime_hours(config.jwt.expiration_hours),
    );

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let project_repository = Arc::new(PostgresProjectRepository::new(pg_pool.clone()));
    let task_repository = Arc::new(PostgresTaskRepository::new(pg_pool));

    let user_service = Arc::new(UserService::new(user_repository));
    let project_service = Arc::new(ProjectService::new(Arc::clone(&project_repository)));
    let task_service = Arc::new(TaskService::new(task_repository, project_repository));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application =
        create_router(user_service, project_service, task_service, authenticator);

    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited");

    Ok(())
}
