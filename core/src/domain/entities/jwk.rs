//! JSON Web Key Set wire types.

use serde::{Deserialize, Serialize};

/// A published RSA signing key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicJwk {
    /// Key type, always `RSA`
    pub kty: String,
    /// Algorithm, always `RS256`
    pub alg: String,
    /// Key identifier
    pub kid: String,
    /// Modulus, base64url without padding
    pub n: String,
    /// Exponent, base64url without padding
    pub e: String,
    /// Key use, always `sig`
    #[serde(rename = "use")]
    pub key_use: String,
}

/// A JSON Web Key Set document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySetDocument {
    /// Published keys, in no guaranteed order
    #[serde(default)]
    pub keys: Vec<PublicJwk>,
}

impl KeySetDocument {
    /// Finds a key by identifier
    pub fn find(&self, kid: &str) -> Option<&PublicJwk> {
        self.keys.iter().find(|k| k.kid == kid)
    }

    /// Identifiers of every published key
    pub fn key_ids(&self) -> Vec<&str> {
        self.keys.iter().map(|k| k.kid.as_str()).collect()
    }
}
