//! JSON Web Key Set publishing

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rsa::traits::PublicKeyParts;
use tracing::{debug, error, warn};

use crate::domain::entities::{KeySetDocument, PublicJwk, SIGNING_ALGORITHM};
use crate::repositories::KeyValueStore;

use super::key_pool::{KeyPair, KeyPool};

/// Cache entry holding the serialized key set
pub const JWKS_CACHE_KEY: &str = "jwk_cache";

/// Converts a key pair's public half into its published form
pub fn encode_jwk(pair: &KeyPair) -> PublicJwk {
    let public_key = pair.public_key();
    PublicJwk {
        kty: "RSA".to_string(),
        alg: SIGNING_ALGORITHM.to_string(),
        kid: pair.kid().to_string(),
        n: URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be()),
        e: URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be()),
        key_use: "sig".to_string(),
    }
}

/// Publishes the pool's public keys, caching the serialized document.
///
/// The cache entry is never invalidated; the pool is fixed for the
/// lifetime of the process.
pub struct KeySetPublisher {
    pool: Arc<KeyPool>,
    cache: Arc<dyn KeyValueStore>,
}

impl KeySetPublisher {
    /// Creates a publisher over `pool`, caching in `cache`
    pub fn new(pool: Arc<KeyPool>, cache: Arc<dyn KeyValueStore>) -> Self {
        Self { pool, cache }
    }

    /// Returns the current key set.
    ///
    /// Never fails: a cache entry that does not deserialize is recomputed,
    /// and a document that cannot be cached is still returned.
    pub fn publish(&self) -> KeySetDocument {
        if let Some(cached) = self.cache.get(JWKS_CACHE_KEY) {
            match serde_json::from_str::<KeySetDocument>(&cached) {
                Ok(document) => {
                    debug!(keys = document.keys.len(), "Key set served from cache");
                    return document;
                }
                Err(e) => warn!(error = %e, "Discarding unreadable cached key set"),
            }
        }

        let document = KeySetDocument {
            keys: self.pool.iter().map(encode_jwk).collect(),
        };

        match serde_json::to_string(&document) {
            Ok(serialized) => {
                self.cache.set(JWKS_CACHE_KEY, serialized);
                debug!(keys = document.keys.len(), "Key set computed and cached");
            }
            Err(e) => error!(error = %e, "Key set serialization failed; serving uncached"),
        }

        document
    }
}
