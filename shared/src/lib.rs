//! Shared configuration and wire types for the JWKS-RSA server
//!
//! - Configuration types loaded from the environment
//! - The error body returned by the HTTP layer

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, DiscoveryConfig, Environment, JwtConfig, KeySetSourceKind,
    KeysConfig, LogFormat, LoggingConfig, ServerConfig,
};
pub use errors::{error_codes, ErrorResponse};
