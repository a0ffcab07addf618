//! Token signing, key material and key discovery configuration

use serde::{Deserialize, Serialize};

/// Default environment variables holding the signing keys
pub const DEFAULT_KEY_VARS: [&str; 3] = ["RSA_PRIVATE_KEY1", "RSA_PRIVATE_KEY2", "RSA_PRIVATE_KEY3"];

/// Default discovery endpoint served by this process
pub const DEFAULT_JWKS_URL: &str = "http://localhost:8080/auth/keys";

/// Upper bound accepted for a configured token lifetime (ten years)
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 10 * 365 * 86400;

/// JWT issuance configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Access token lifetime in seconds
    pub access_token_expiry: i64,

    /// Refresh token lifetime in seconds
    pub refresh_token_expiry: i64,

    /// Optional `iss` claim
    #[serde(default)]
    pub issuer: Option<String>,

    /// Optional `aud` claim
    #[serde(default)]
    pub audience: Option<String>,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            access_token_expiry: 900,     // 15 minutes
            refresh_token_expiry: 604800, // 7 days
            issuer: None,
            audience: None,
        }
    }
}

impl JwtConfig {
    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            access_token_expiry: parse_env("JWT_ACCESS_TOKEN_EXPIRY")
                .filter(|&secs| is_valid_lifetime(secs))
                .unwrap_or(defaults.access_token_expiry),
            refresh_token_expiry: parse_env("JWT_REFRESH_TOKEN_EXPIRY")
                .filter(|&secs| is_valid_lifetime(secs))
                .unwrap_or(defaults.refresh_token_expiry),
            issuer: std::env::var("JWT_ISSUER").ok().filter(|s| !s.is_empty()),
            audience: std::env::var("JWT_AUDIENCE").ok().filter(|s| !s.is_empty()),
        }
    }
}

/// Where the signing keys come from
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeysConfig {
    /// Ordered environment variable names, each holding one base64-encoded PEM RSA private key
    pub key_vars: Vec<String>,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            key_vars: DEFAULT_KEY_VARS.iter().map(|v| v.to_string()).collect(),
        }
    }
}

impl KeysConfig {
    /// Create from `RSA_PRIVATE_KEY_VARS` (comma separated), falling back to the defaults
    pub fn from_env() -> Self {
        match std::env::var("RSA_PRIVATE_KEY_VARS") {
            Ok(vars) => Self::from_list(&vars),
            Err(_) => Self::default(),
        }
    }

    /// Parse a comma separated list of variable names
    pub fn from_list(vars: &str) -> Self {
        Self {
            key_vars: vars
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}

/// Which key set the request verifier resolves keys against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeySetSourceKind {
    /// Read the in-process key pool
    Local,
    /// Fetch the published key set over HTTP
    #[default]
    Remote,
}

impl std::str::FromStr for KeySetSourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(KeySetSourceKind::Local),
            "remote" => Ok(KeySetSourceKind::Remote),
            _ => Err(format!("Invalid key set source: {}", s)),
        }
    }
}

/// Key set discovery configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiscoveryConfig {
    /// URL of the published key set
    pub jwks_url: String,

    /// Seconds a fetched key set is reused before refetching
    pub refresh_interval: u64,

    /// Seconds allowed for a single fetch
    pub fetch_timeout: u64,

    /// Local pool or remote URL
    #[serde(default)]
    pub source: KeySetSourceKind,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            jwks_url: String::from(DEFAULT_JWKS_URL),
            refresh_interval: 300,
            fetch_timeout: 5,
            source: KeySetSourceKind::default(),
        }
    }
}

impl DiscoveryConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            jwks_url: std::env::var("JWKS_URL").unwrap_or(defaults.jwks_url),
            refresh_interval: parse_env("JWKS_REFRESH_INTERVAL")
                .unwrap_or(defaults.refresh_interval),
            fetch_timeout: parse_env("JWKS_FETCH_TIMEOUT").unwrap_or(defaults.fetch_timeout),
            source: parse_env("VERIFIER_KEY_SOURCE").unwrap_or(defaults.source),
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Signing key sources
    #[serde(default)]
    pub keys: KeysConfig,

    /// Key set discovery
    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            jwt: JwtConfig::from_env(),
            keys: KeysConfig::from_env(),
            discovery: DiscoveryConfig::from_env(),
        }
    }
}

/// Lifetimes must be positive and at most [`MAX_TOKEN_LIFETIME_SECS`]
pub fn is_valid_lifetime(secs: i64) -> bool {
    secs > 0 && secs <= MAX_TOKEN_LIFETIME_SECS
}

fn parse_env<T: std::str::FromStr>(var: &str) -> Option<T> {
    std::env::var(var).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_default() {
        let config = JwtConfig::default();
        assert_eq!(config.access_token_expiry, 900);
        assert_eq!(config.refresh_token_expiry, 604800);
        assert!(config.issuer.is_none());
    }

    #[test]
    fn test_jwt_config_builder() {
        let config = JwtConfig::default()
            .with_access_expiry_minutes(30)
            .with_refresh_expiry_days(14);

        assert_eq!(config.access_token_expiry, 1800);
        assert_eq!(config.refresh_token_expiry, 1209600);
    }

    #[test]
    fn test_lifetime_bounds() {
        assert!(is_valid_lifetime(1));
        assert!(is_valid_lifetime(JwtConfig::default().refresh_token_expiry));
        assert!(is_valid_lifetime(MAX_TOKEN_LIFETIME_SECS));
        assert!(!is_valid_lifetime(0));
        assert!(!is_valid_lifetime(-900));
        assert!(!is_valid_lifetime(MAX_TOKEN_LIFETIME_SECS + 1));
        assert!(!is_valid_lifetime(10_000_000_000_000));
    }

    #[test]
    fn test_jwt_config_from_env_rejects_out_of_range_lifetimes() {
        std::env::set_var("JWT_ACCESS_TOKEN_EXPIRY", "10000000000000");
        std::env::set_var("JWT_REFRESH_TOKEN_EXPIRY", "-60");
        let config = JwtConfig::from_env();
        std::env::remove_var("JWT_ACCESS_TOKEN_EXPIRY");
        std::env::remove_var("JWT_REFRESH_TOKEN_EXPIRY");

        assert_eq!(config.access_token_expiry, 900);
        assert_eq!(config.refresh_token_expiry, 604800);
    }

    #[test]
    fn test_keys_config_default_vars() {
        let config = KeysConfig::default();
        assert_eq!(
            config.key_vars,
            vec!["RSA_PRIVATE_KEY1", "RSA_PRIVATE_KEY2", "RSA_PRIVATE_KEY3"]
        );
    }

    #[test]
    fn test_keys_config_from_list() {
        let config = KeysConfig::from_list(" KEY_A, ,KEY_B ");
        assert_eq!(config.key_vars, vec!["KEY_A", "KEY_B"]);
    }

    #[test]
    fn test_discovery_config_default() {
        let config = DiscoveryConfig::default();
        assert_eq!(config.jwks_url, "http://localhost:8080/auth/keys");
        assert_eq!(config.source, KeySetSourceKind::Remote);
        assert_eq!(config.fetch_timeout, 5);
    }

    #[test]
    fn test_key_set_source_kind_from_str() {
        assert_eq!("LOCAL".parse::<KeySetSourceKind>().unwrap(), KeySetSourceKind::Local);
        assert!("ldap".parse::<KeySetSourceKind>().is_err());
    }
}
