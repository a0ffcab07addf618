//! Token issuance

use std::sync::{Arc, Mutex, PoisonError};

use jsonwebtoken::{encode, Algorithm, Header};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, error};

use crate::domain::entities::{Claims, TokenClass, TokenPair};
use crate::errors::TokenError;

use super::config::TokenServiceConfig;
use super::key_pool::{KeyPair, KeyPool};

/// Signs tokens with a key chosen at random from the pool
pub struct TokenIssuer {
    pool: Arc<KeyPool>,
    config: TokenServiceConfig,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl TokenIssuer {
    /// Creates an issuer whose key selection is seeded from OS entropy
    pub fn new(pool: Arc<KeyPool>, config: TokenServiceConfig) -> Self {
        Self::with_rng(pool, config, StdRng::from_entropy())
    }

    /// Creates an issuer with an explicit randomness source
    pub fn with_rng<R>(pool: Arc<KeyPool>, config: TokenServiceConfig, rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        Self {
            pool,
            config,
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// Issues a signed token of `class` for `subject`
    pub fn issue(&self, class: TokenClass, subject: &str) -> Result<String, TokenError> {
        let lifetime = self.config.lifetime_for(class);
        let claims = Claims::new(class, subject, lifetime)
            .ok_or_else(|| {
                error!(%class, lifetime, "Token expiry overflows the timestamp range");
                TokenError::SigningFailed {
                    message: format!("{} token lifetime of {}s is out of range", class, lifetime),
                }
            })?
            .with_registered(self.config.issuer.clone(), self.config.audience.clone());
        self.sign(&claims)
    }

    /// Issues an access and a refresh token for `subject`
    pub fn issue_pair(&self, subject: &str) -> Result<TokenPair, TokenError> {
        let access_token = self.issue(TokenClass::Access, subject)?;
        let refresh_token = self.issue(TokenClass::Refresh, subject)?;

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.config.access_token_expiry_secs,
        ))
    }

    /// Signs arbitrary claims; the header declares RS256 and the chosen key's `kid`
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        let key = self.select_key();
        debug!(kid = %key.kid(), class = %claims.token_type, "Signing token");

        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(key.kid().to_string());

        encode(&header, claims, key.encoding_key()).map_err(|e| {
            error!(kid = %key.kid(), error = %e, "Token signing failed");
            TokenError::SigningFailed {
                message: e.to_string(),
            }
        })
    }

    fn select_key(&self) -> &KeyPair {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        self.pool.select_for_signing(&mut *rng)
    }
}
