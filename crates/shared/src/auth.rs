//! Authentication types for JWT tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role granted to internal callers that may manage any attachment.
pub const SERVICE_ROLE: &str = "service";

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID, opaque string).
    pub sub: String,
    /// Caller role; `"service"` marks a trusted caller.
    #[serde(default)]
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: &str, role: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.sub
    }

    /// Whether the token belongs to a trusted internal caller.
    #[must_use]
    pub fn is_trusted(&self) -> bool {
        self.role == SERVICE_ROLE
    }
}
