//! Token services
//!
//! This module handles:
//! - Loading the RS256 key pool and deriving key identifiers
//! - Issuing signed access and refresh tokens
//! - Publishing the pool as a JSON Web Key Set
//! - Verifying tokens against a local or fetched key set

mod config;
mod issuer;
mod key_id;
mod key_pool;
mod publisher;
mod source;
mod verifier;

#[cfg(test)]
mod tests;

pub use config::TokenServiceConfig;
pub use issuer::TokenIssuer;
pub use key_id::{derive_key_id, KEY_ID_BYTES};
pub use key_pool::{KeyPair, KeyPool, KeySource};
pub use publisher::{encode_jwk, KeySetPublisher, JWKS_CACHE_KEY};
pub use source::{KeySetSource, LocalKeySet, StaticKeySet};
pub use verifier::TokenVerifier;
