use async_trait::async_trait;
use auth::Authenticator;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity of the caller, resolved from a valid bearer token.
///
/// Stored in request extensions by [`authenticate`]; handlers take it as an
/// extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
}

/// Token from an `Authorization: Bearer <token>` header.
///
/// `None` when the header is missing, not valid UTF-8, uses another scheme,
/// or carries an empty token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let token = headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)?
        .trim();

    (!token.is_empty()).then_some(token)
}

/// Verify the bearer token in `headers` and resolve the caller.
pub fn resolve_identity(
    authenticator: &Authenticator,
    headers: &HeaderMap,
) -> Option<AuthenticatedUser> {
    let identity = authenticator.verify_token(bearer_token(headers)?)?;
    let user_id = UserId::from_string(&identity.id).ok()?;

    Some(AuthenticatedUser {
        user_id,
        email: identity.email,
    })
}

/// Caller's user id, or `None` when the request carries no valid token.
pub fn resolve_user_id(authenticator: &Authenticator, headers: &HeaderMap) -> Option<UserId> {
    resolve_identity(authenticator, headers).map(|user| user.user_id)
}

fn unauthorized(message: &str) -> Response {
    ApiError::Unauthorized(message.to_string()).into_response()
}

/// Access gate for protected routes.
///
/// Rejects with 401 before the handler runs unless the request carries a
/// valid, unexpired token.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = bearer_token(req.headers()).ok_or_else(|| {
        tracing::warn!(uri = %req.uri(), "Missing or malformed Authorization header");
        unauthorized("Missing or invalid Authorization header")
    })?;

    let claims = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "JWT validation failed");
        unauthorized("Invalid or expired token")
    })?;

    let user_id = UserId::from_string(&claims.id).map_err(|e| {
        tracing::warn!(error = %e, "Token carries a malformed user id");
        unauthorized("Invalid or expired token")
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id,
        email: claims.email,
    });

    Ok(next.run(req).await)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(user.clone());
        }

        resolve_identity(&state.authenticator, &parts.headers)
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
    }
}
