use thiserror::Error;

/// Error type for password operations.
///
/// Verification has no error case: a mismatch and an unreadable stored hash
/// both simply fail to verify.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}
