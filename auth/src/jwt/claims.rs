use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Tokens live for a fixed 24 hours unless configured otherwise.
pub const DEFAULT_TOKEN_LIFETIME_HOURS: i64 = 24;

/// Identity carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// User identifier
    pub id: String,
    /// User email at the time the token was issued
    pub email: String,
}

impl Identity {
    pub fn new(id: impl ToString, email: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            email: email.into(),
        }
    }
}

/// Access token payload.
///
/// Serialized as `{ "id", "email", "iat", "exp" }`. Both timestamps are Unix
/// seconds and `exp` is mandatory: a token without one is rejected on decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User identifier
    pub id: String,

    /// User email
    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for an identity, issued now and expiring after `lifetime_hours`.
    ///
    /// # Arguments
    /// * `identity` - User the token is issued to
    /// * `lifetime_hours` - Hours until token expires
    ///
    /// # Returns
    /// Claims with id, email, iat and exp set
    pub fn for_identity(identity: &Identity, lifetime_hours: i64) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::hours(lifetime_hours);

        Self {
            id: identity.id.clone(),
            email: identity.email.clone(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Override issued-at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = iat;
        self
    }

    /// Override expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = exp;
        self
    }

    /// Identity the token was issued to.
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            email: self.email.clone(),
        }
    }

    /// Check if token is expired at `current_timestamp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
