use thiserror::Error;

/// Error type for JWT operations.
///
/// Callers authorizing requests must treat every decode failure the same way:
/// an expired token is no more trustworthy than a forged one.
#[derive(Debug, Clone, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token is invalid: {0}")]
    InvalidToken(String),
}
