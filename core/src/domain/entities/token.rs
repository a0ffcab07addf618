//! Token entities for RS256 bearer tokens.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// The only signing algorithm this system issues or accepts
pub const SIGNING_ALGORITHM: &str = "RS256";

/// Class of a bearer token, carried in the `token_type` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenClass {
    /// Short-lived token presented on API requests
    Access,
    /// Long-lived token exchanged for a new token pair
    Refresh,
}

impl std::fmt::Display for TokenClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenClass::Access => write!(f, "access"),
            TokenClass::Refresh => write!(f, "refresh"),
        }
    }
}

/// Claims structure for the JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Token class
    pub token_type: TokenClass,

    /// Subject the token was issued for
    pub user_id: String,

    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,

    /// Issued at timestamp
    #[serde(default)]
    pub iat: i64,

    /// Issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Audience
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

impl Claims {
    /// Creates claims expiring `lifetime_secs` from now.
    ///
    /// Returns `None` when the expiry does not fit in an `i64` timestamp.
    pub fn new(
        token_type: TokenClass,
        user_id: impl Into<String>,
        lifetime_secs: i64,
    ) -> Option<Self> {
        let now = Utc::now().timestamp();
        let exp = now.checked_add(lifetime_secs)?;

        Some(Self {
            token_type,
            user_id: user_id.into(),
            exp,
            iat: now,
            iss: None,
            aud: None,
        })
    }

    /// Sets the registered `iss` and `aud` claims
    pub fn with_registered(mut self, issuer: Option<String>, audience: Option<String>) -> Self {
        self.iss = issuer;
        self.aud = audience;
        self
    }

    /// A token is expired once `exp` is at or before the current second
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }
}

/// Identity produced by a successful verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    /// Subject the token was issued for
    pub user_id: String,
}

/// Access and refresh token issued together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed access token
    pub access_token: String,
    /// Signed refresh token
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    /// Always `Bearer`
    pub token_type: String,
}

impl TokenPair {
    /// Creates a bearer token pair
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
            token_type: "Bearer".to_string(),
        }
    }
}
