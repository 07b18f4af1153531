use thiserror::Error;

use crate::domain::project::models::ProjectId;

/// Error for ProjectId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for ProjectName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectNameError {
    #[error("Project name must not be empty")]
    Empty,

    #[error("Project name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error for all project-related operations
#[derive(Debug, Clone, Error)]
pub enum ProjectError {
    #[error("Invalid project ID: {0}")]
    InvalidProjectId(#[from] ProjectIdError),

    #[error("Invalid project name: {0}")]
    InvalidName(#[from] ProjectNameError),

    /// Also returned when the project exists but belongs to someone else.
    #[error("Project not found: {0}")]
    NotFound(ProjectId),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
