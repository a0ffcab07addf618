//! Error types for key loading, token operations and account operations

use thiserror::Error;

use crate::domain::entities::TokenClass;

/// Key material errors. All of them are fatal at startup.
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Key source not provided: {source_name}")]
    MissingSource { source_name: String },

    #[error("Key source {source_name} is not valid base64")]
    InvalidEncoding { source_name: String },

    #[error("Key source {source_name} is not an RSA private key: {message}")]
    InvalidKey { source_name: String, message: String },

    #[error("No signing keys configured")]
    EmptyPool,
}

/// Token issuance and verification errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token signing failed: {message}")]
    SigningFailed { message: String },

    #[error("Malformed token")]
    Malformed,

    #[error("Signing key not found: {kid}")]
    KeyNotFound { kid: String },

    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Unsupported signing algorithm: {alg}")]
    UnsupportedAlgorithm { alg: String },

    #[error("Token expired")]
    Expired,

    #[error("Wrong token class: expected {expected}, got {actual}")]
    WrongTokenClass {
        expected: TokenClass,
        actual: TokenClass,
    },

    #[error("Key set unavailable: {message}")]
    KeySetUnavailable { message: String },
}

impl TokenError {
    /// Whether this error is a rejected verification rather than an issuance failure
    pub fn is_verification_failure(&self) -> bool {
        !matches!(self, TokenError::SigningFailed { .. })
    }

    /// Stable short name of the rejection reason, for logs
    pub fn reason(&self) -> &'static str {
        match self {
            TokenError::SigningFailed { .. } => "signing_failed",
            TokenError::Malformed => "malformed",
            TokenError::KeyNotFound { .. } => "key_not_found",
            TokenError::InvalidSignature => "invalid_signature",
            TokenError::UnsupportedAlgorithm { .. } => "unsupported_algorithm",
            TokenError::Expired => "expired",
            TokenError::WrongTokenClass { .. } => "wrong_token_class",
            TokenError::KeySetUnavailable { .. } => "key_set_unavailable",
        }
    }
}

/// Account registration and login errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,
}
