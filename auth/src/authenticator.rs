use std::sync::OnceLock;

use crate::jwt::Claims;
use crate::jwt::Identity;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::DEFAULT_TOKEN_LIFETIME_HOURS;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Plaintext behind the hash verified when a login names no account.
const UNKNOWN_ACCOUNT_PASSWORD: &str = "unknown-account-placeholder";

/// Authentication coordinator combining password verification and token issuance.
///
/// Built once at startup from the configured secret and shared read-only
/// between requests.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    token_lifetime_hours: i64,
    unknown_account_hash: OnceLock<Option<String>>,
}

/// Result of successful authentication.
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator issuing tokens valid for 24 hours.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
            token_lifetime_hours: DEFAULT_TOKEN_LIFETIME_HOURS,
            unknown_account_hash: OnceLock::new(),
        }
    }

    /// Change how long issued tokens stay valid.
    pub fn with_token_lifetime_hours(mut self, hours: i64) -> Self {
        self.token_lifetime_hours = hours;
        self
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a token for `identity`.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `identity` - User the token is issued to
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match (or stored hash is unreadable)
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        identity: &Identity,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.issue_token(identity)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Reject a login for an email with no account.
    ///
    /// Still runs one full Argon2 verification against a fixed hash, so the
    /// response takes as long as a wrong password for a real account.
    pub fn reject_unknown_account(&self, password: &str) -> AuthenticationError {
        if let Some(hash) = self.unknown_account_hash() {
            let _ = self.password_hasher.verify(password, hash);
        }
        AuthenticationError::InvalidCredentials
    }

    fn unknown_account_hash(&self) -> Option<&str> {
        self.unknown_account_hash
            .get_or_init(|| self.password_hasher.hash(UNKNOWN_ACCOUNT_PASSWORD).ok())
            .as_deref()
    }

    /// Issue a token without password verification.
    ///
    /// Used right after registration, where the caller has just chosen the password.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token(&self, identity: &Identity) -> Result<String, JwtError> {
        let claims = Claims::for_identity(identity, self.token_lifetime_hours);
        self.jwt_handler.encode(&claims)
    }

    /// Validate a token and decode its claims.
    ///
    /// # Errors
    /// * `TokenExpired` - Token expired
    /// * `InvalidToken` - Malformed or forged token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token)
    }

    /// Resolve a token to the identity it was issued to.
    ///
    /// Returns `None` for malformed, forged and expired tokens alike.
    pub fn verify_token(&self, token: &str) -> Option<Identity> {
        self.validate_token(token)
            .ok()
            .map(|claims| claims.identity())
    }
}
