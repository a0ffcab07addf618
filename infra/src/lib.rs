//! # Infrastructure Layer
//!
//! Concrete collaborators for the core services:
//! - **Cache**: in-process key-value store backing the key set cache and the
//!   user registry
//! - **Discovery**: key set fetched from a remote JWKS endpoint over HTTP

use std::time::Duration;

use jr_core::errors::TokenError;

/// Cache module - in-memory key-value store
pub mod cache;

/// Discovery module - remote key set source
pub mod discovery;

pub use cache::MemoryStore;
pub use discovery::{RefreshPolicy, RemoteKeySet};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Request did not complete in time
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Endpoint answered with a non-success status
    #[error("Unexpected HTTP status: {status}")]
    Status { status: u16 },
}

impl From<InfrastructureError> for TokenError {
    fn from(err: InfrastructureError) -> Self {
        TokenError::KeySetUnavailable {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infrastructure_errors_fail_closed() {
        let err: TokenError = InfrastructureError::Status { status: 503 }.into();
        assert_eq!(
            err,
            TokenError::KeySetUnavailable {
                message: "Unexpected HTTP status: 503".to_string()
            }
        );

        let err: TokenError = InfrastructureError::Timeout(Duration::from_secs(5)).into();
        assert!(matches!(err, TokenError::KeySetUnavailable { .. }));
    }
}
