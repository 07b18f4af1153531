use auth::AuthenticationError;
use auth::Identity;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::JsonBody;
use super::UserData;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::DisplayName;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::inbound::http::router::AppState;

const MISSING_FIELDS: &str = "Missing required fields";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    email: Option<String>,
    password: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthResponseData {
    pub user: UserData,
    pub token: String,
}

/// Blank strings count as missing.
fn required(field: Option<String>) -> Result<String, ApiError> {
    field
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest(MISSING_FIELDS.to_string()))
}

fn identity_of(user: &User) -> Identity {
    Identity::new(user.id, user.email.as_str())
}

pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    let email = required(body.email)?;
    let password = required(body.password)?;
    let name = required(body.name)?;

    let email = EmailAddress::new(email)
        .map_err(|_| ApiError::BadRequest("Invalid email format".to_string()))?;
    let name = DisplayName::new(name).map_err(UserError::from)?;

    let user = state
        .user_service
        .register(RegisterUserCommand::new(email, name, password))
        .await?;

    let token = state
        .authenticator
        .issue_token(&identity_of(&user))
        .map_err(|e| ApiError::InternalServerError(format!("Token generation failed: {}", e)))?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        AuthResponseData {
            user: (&user).into(),
            token,
        },
    ))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    let email = required(body.email)?;
    let password = required(body.password)?;

    // An address that fails validation cannot belong to any account.
    let email = EmailAddress::new(email)
        .map_err(|_| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    let user = state
        .user_service
        .get_user_by_email(&email)
        .await
        .map_err(|e| match e {
            UserError::NotFoundByEmail(_) => {
                tracing::debug!(email = %email, "Login for unknown email");
                let _ = state.authenticator.reject_unknown_account(&password);
                ApiError::Unauthorized(INVALID_CREDENTIALS.to_string())
            }
            _ => ApiError::from(e),
        })?;

    let result = state
        .authenticator
        .authenticate(&password, &user.password_hash, &identity_of(&user))
        .map_err(|e| match e {
            AuthenticationError::InvalidCredentials => {
                tracing::debug!(user_id = %user.id, "Login with wrong password");
                ApiError::Unauthorized(INVALID_CREDENTIALS.to_string())
            }
            AuthenticationError::JwtError(err) => {
                ApiError::InternalServerError(format!("Token generation failed: {}", err))
            }
        })?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(ApiSuccess::new(
        StatusCode::OK,
        AuthResponseData {
            user: (&user).into(),
            token: result.access_token,
        },
    ))
}
