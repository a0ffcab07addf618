//! Configuration for the token services

use jr_shared::config::JwtConfig;

use crate::domain::entities::TokenClass;

/// Fixed token lifetimes and registered claims
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Access token lifetime in seconds
    pub access_token_expiry_secs: i64,
    /// Refresh token lifetime in seconds
    pub refresh_token_expiry_secs: i64,
    /// Optional `iss` claim
    pub issuer: Option<String>,
    /// Optional `aud` claim
    pub audience: Option<String>,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            access_token_expiry_secs: 900,
            refresh_token_expiry_secs: 604800,
            issuer: None,
            audience: None,
        }
    }
}

impl TokenServiceConfig {
    /// Lifetime applied to tokens of the given class
    pub fn lifetime_for(&self, class: TokenClass) -> i64 {
        match class {
            TokenClass::Access => self.access_token_expiry_secs,
            TokenClass::Refresh => self.refresh_token_expiry_secs,
        }
    }
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(config: &JwtConfig) -> Self {
        Self {
            access_token_expiry_secs: config.access_token_expiry,
            refresh_token_expiry_secs: config.refresh_token_expiry,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        }
    }
}
