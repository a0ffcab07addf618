//! Token verification against a published key set

use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use jsonwebtoken::{crypto, decode_header, Algorithm, DecodingKey, Header};
use tracing::{debug, warn};

use crate::domain::entities::{Claims, KeySetDocument, TokenClass, VerifiedIdentity};
use crate::errors::TokenError;

use super::source::KeySetSource;

/// Verifies tokens using only keys resolved from a [`KeySetSource`].
///
/// Checks run in a fixed order and the first failure wins: header, key
/// set, key identifier, signature, algorithm, expiry, token class.
pub struct TokenVerifier {
    source: Arc<dyn KeySetSource>,
    fetch_timeout: Option<Duration>,
}

impl TokenVerifier {
    /// Creates a verifier resolving keys from `source`
    pub fn new(source: Arc<dyn KeySetSource>) -> Self {
        Self {
            source,
            fetch_timeout: None,
        }
    }

    /// Bounds how long obtaining the key set may take
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    /// Verifies `token` and requires it to be of class `expected`
    pub async fn verify(
        &self,
        expected: TokenClass,
        token: &str,
    ) -> Result<VerifiedIdentity, TokenError> {
        let result = self.verify_inner(expected, token).await;
        log_outcome(expected, &result);
        result
    }

    /// Verifies `token` against a key set supplied by the caller
    pub fn verify_with_key_set(
        expected: TokenClass,
        token: &str,
        key_set: &KeySetDocument,
    ) -> Result<VerifiedIdentity, TokenError> {
        let result = parse_header(token).and_then(|header| check(expected, token, &header, key_set));
        log_outcome(expected, &result);
        result
    }

    /// Asks the source for a fresh key set, e.g. after a `KeyNotFound` caused by a stale cache
    pub async fn refresh_key_set(&self) -> Result<KeySetDocument, TokenError> {
        self.bounded(self.source.refresh()).await
    }

    async fn verify_inner(
        &self,
        expected: TokenClass,
        token: &str,
    ) -> Result<VerifiedIdentity, TokenError> {
        let header = parse_header(token)?;
        let key_set = self.bounded(self.source.key_set()).await?;
        check(expected, token, &header, &key_set)
    }

    async fn bounded<F>(&self, fetch: F) -> Result<KeySetDocument, TokenError>
    where
        F: std::future::Future<Output = Result<KeySetDocument, TokenError>>,
    {
        match self.fetch_timeout {
            Some(limit) => tokio::time::timeout(limit, fetch).await.map_err(|_| {
                TokenError::KeySetUnavailable {
                    message: format!("key set fetch exceeded {:?}", limit),
                }
            })?,
            None => fetch.await,
        }
    }
}

fn log_outcome(expected: TokenClass, result: &Result<VerifiedIdentity, TokenError>) {
    match result {
        Ok(identity) => debug!(class = %expected, user_id = %identity.user_id, "Token accepted"),
        Err(e) => warn!(class = %expected, reason = e.reason(), error = %e, "Token rejected"),
    }
}

fn parse_header(token: &str) -> Result<Header, TokenError> {
    decode_header(token).map_err(|_| TokenError::Malformed)
}

fn check(
    expected: TokenClass,
    token: &str,
    header: &Header,
    key_set: &KeySetDocument,
) -> Result<VerifiedIdentity, TokenError> {
    let kid = header.kid.as_deref().unwrap_or_default();
    let jwk = key_set.find(kid).ok_or_else(|| TokenError::KeyNotFound {
        kid: kid.to_string(),
    })?;
    let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e).map_err(|_| TokenError::Malformed)?;

    let (message, signature) = token.rsplit_once('.').ok_or(TokenError::Malformed)?;
    if !is_rsa_family(header.alg) {
        // jsonwebtoken hits unreachable! verifying an RSA components key under HMAC or EC
        return Err(unsupported(header.alg));
    }
    match crypto::verify(signature, message.as_bytes(), &key, header.alg) {
        Ok(true) => {}
        _ => return Err(TokenError::InvalidSignature),
    }
    if header.alg != Algorithm::RS256 {
        return Err(unsupported(header.alg));
    }

    let claims = decode_claims(message)?;
    if claims.is_expired_at(Utc::now().timestamp()) {
        return Err(TokenError::Expired);
    }
    if claims.token_type != expected {
        return Err(TokenError::WrongTokenClass {
            expected,
            actual: claims.token_type,
        });
    }

    Ok(VerifiedIdentity {
        user_id: claims.user_id,
    })
}

fn decode_claims(message: &str) -> Result<Claims, TokenError> {
    let (_, payload) = message.split_once('.').ok_or(TokenError::Malformed)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)
}

fn is_rsa_family(alg: Algorithm) -> bool {
    matches!(
        alg,
        Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512
    )
}

fn unsupported(alg: Algorithm) -> TokenError {
    TokenError::UnsupportedAlgorithm {
        alg: format!("{:?}", alg),
    }
}
