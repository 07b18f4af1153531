use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::project::errors::ProjectIdError;
use crate::domain::project::errors::ProjectNameError;
use crate::domain::user::models::UserId;

/// Project unique identifier value object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProjectId(pub Uuid);

impl ProjectId {
    /// Generate a new random project ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a project ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, ProjectIdError> {
        Uuid::parse_str(s)
            .map(ProjectId)
            .map_err(|e| ProjectIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Project name value object.
///
/// Non-blank after trimming, at most 200 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectName(String);

impl ProjectName {
    const MAX_LENGTH: usize = 200;

    pub fn new(name: String) -> Result<Self, ProjectNameError> {
        let name = name.trim().to_string();
        let length = name.chars().count();

        if length == 0 {
            Err(ProjectNameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(ProjectNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Project owned by a single user.
#[derive(Debug, Clone)]
pub struct Project {
    pub id: ProjectId,
    pub name: ProjectName,
    pub description: Option<String>,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Command to create a project for the calling user.
#[derive(Debug)]
pub struct CreateProjectCommand {
    pub name: ProjectName,
    pub description: Option<String>,
}

/// Partial update; only provided fields change.
///
/// `description: Some(None)` clears the description.
#[derive(Debug, Default)]
pub struct UpdateProjectCommand {
    pub name: Option<ProjectName>,
    pub description: Option<Option<String>>,
}
