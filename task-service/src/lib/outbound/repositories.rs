pub mod project;
pub mod task;
pub mod user;

pub use project::PostgresProjectRepository;
pub use task::PostgresTaskRepository;
pub use user::PostgresUserRepository;
