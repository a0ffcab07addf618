//! RS256 key pool used for signing and for publishing public keys

use std::fs;
use std::path::PathBuf;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use jsonwebtoken::EncodingKey;
use rand::Rng;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::{RsaPrivateKey, RsaPublicKey};
use tracing::{info, warn};

use crate::errors::KeyError;

use super::key_id::derive_key_id;

/// Where one signing key is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// Environment variable holding a base64-encoded PEM private key
    EnvVar(String),
    /// Base64-encoded PEM private key
    Base64Pem(String),
    /// PEM private key text
    Pem(String),
    /// File containing a PEM private key
    PemFile(PathBuf),
}

impl KeySource {
    /// Sources for a list of environment variable names, in order
    pub fn from_env_vars<I, S>(vars: I) -> Vec<KeySource>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        vars.into_iter().map(|v| KeySource::EnvVar(v.into())).collect()
    }

    /// Name used in logs and errors; never includes key material
    fn describe(&self, index: usize) -> String {
        match self {
            KeySource::EnvVar(name) => name.clone(),
            KeySource::PemFile(path) => path.display().to_string(),
            KeySource::Base64Pem(_) | KeySource::Pem(_) => format!("inline key #{}", index + 1),
        }
    }

    /// Resolves the source to PEM text
    fn read_pem(&self, name: &str) -> Result<String, KeyError> {
        match self {
            KeySource::EnvVar(var) => {
                let encoded = std::env::var(var).map_err(|_| KeyError::MissingSource {
                    source_name: name.to_string(),
                })?;
                decode_base64_pem(&encoded, name)
            }
            KeySource::Base64Pem(encoded) => decode_base64_pem(encoded, name),
            KeySource::Pem(pem) => Ok(pem.clone()),
            KeySource::PemFile(path) => {
                fs::read_to_string(path).map_err(|_| KeyError::MissingSource {
                    source_name: name.to_string(),
                })
            }
        }
    }
}

fn decode_base64_pem(encoded: &str, name: &str) -> Result<String, KeyError> {
    let invalid = || KeyError::InvalidEncoding {
        source_name: name.to_string(),
    };
    let bytes = STANDARD.decode(encoded.trim()).map_err(|_| invalid())?;
    String::from_utf8(bytes).map_err(|_| invalid())
}

/// One signing key with its derived identifier
#[derive(Clone)]
pub struct KeyPair {
    kid: String,
    encoding_key: EncodingKey,
    public_key: RsaPublicKey,
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair").field("kid", &self.kid).finish()
    }
}

impl KeyPair {
    /// Parses a PEM private key, PKCS#1 or PKCS#8
    pub fn from_pem(pem: &str) -> Result<Self, KeyError> {
        Self::parse(pem, "pem")
    }

    fn parse(pem: &str, name: &str) -> Result<Self, KeyError> {
        let invalid = |message: String| KeyError::InvalidKey {
            source_name: name.to_string(),
            message,
        };

        let private_key = RsaPrivateKey::from_pkcs1_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs8_pem(pem))
            .map_err(|e| invalid(e.to_string()))?;
        let encoding_key = EncodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| invalid(e.to_string()))?;
        let public_key = private_key.to_public_key();

        Ok(Self {
            kid: derive_key_id(&public_key),
            encoding_key,
            public_key,
        })
    }

    /// Key identifier embedded in token headers
    pub fn kid(&self) -> &str {
        &self.kid
    }

    /// Private key in signing form
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    /// Public half, safe to publish
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }
}

/// Fixed set of signing keys, immutable once loaded.
///
/// Entries are kept ordered by identifier so that selection with a seeded
/// generator is reproducible.
#[derive(Debug, Clone)]
pub struct KeyPool {
    keys: Vec<KeyPair>,
}

impl KeyPool {
    /// Loads every source in order.
    ///
    /// Any missing or unparsable source fails the whole load, as does an
    /// empty source list. When two sources yield the same identifier the
    /// later one replaces the earlier one.
    pub fn load(sources: &[KeySource]) -> Result<Self, KeyError> {
        if sources.is_empty() {
            return Err(KeyError::EmptyPool);
        }

        let mut pool = Self { keys: Vec::with_capacity(sources.len()) };
        for (index, source) in sources.iter().enumerate() {
            let name = source.describe(index);
            let pem = source.read_pem(&name)?;
            let pair = KeyPair::parse(&pem, &name)?;
            info!(source = %name, kid = %pair.kid, "Loaded signing key");
            pool.insert(pair, &name);
        }

        Ok(pool)
    }

    /// Builds a pool from already parsed key pairs
    pub fn from_pairs(pairs: Vec<KeyPair>) -> Result<Self, KeyError> {
        if pairs.is_empty() {
            return Err(KeyError::EmptyPool);
        }

        let mut pool = Self { keys: Vec::with_capacity(pairs.len()) };
        for (index, pair) in pairs.into_iter().enumerate() {
            pool.insert(pair, &format!("pair #{}", index + 1));
        }
        Ok(pool)
    }

    fn insert(&mut self, pair: KeyPair, name: &str) {
        match self.keys.binary_search_by(|k| k.kid.as_str().cmp(pair.kid.as_str())) {
            Ok(existing) => {
                warn!(source = %name, kid = %pair.kid, "Duplicate signing key replaces earlier entry");
                self.keys[existing] = pair;
            }
            Err(position) => self.keys.insert(position, pair),
        }
    }

    /// Finds a key pair by identifier
    pub fn lookup(&self, kid: &str) -> Option<&KeyPair> {
        self.keys
            .binary_search_by(|k| k.kid.as_str().cmp(kid))
            .ok()
            .map(|i| &self.keys[i])
    }

    /// Picks a signing key uniformly at random
    pub fn select_for_signing<R: Rng + ?Sized>(&self, rng: &mut R) -> &KeyPair {
        // never empty: both constructors reject an empty pool
        &self.keys[rng.gen_range(0..self.keys.len())]
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always false for a loaded pool
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Identifiers in pool order
    pub fn ids(&self) -> Vec<&str> {
        self.keys.iter().map(|k| k.kid.as_str()).collect()
    }

    /// Key pairs in pool order
    pub fn iter(&self) -> impl Iterator<Item = &KeyPair> {
        self.keys.iter()
    }
}
