//! Deterministic key identifiers

use rsa::traits::PublicKeyParts;
use rsa::RsaPublicKey;
use sha2::{Digest, Sha256};

/// Number of digest bytes kept in an identifier (24 hex characters)
pub const KEY_ID_BYTES: usize = 12;

/// Derives the identifier published as `kid` for a public key.
///
/// SHA-256 over the big-endian modulus followed by the least significant
/// byte of the public exponent, truncated to [`KEY_ID_BYTES`] and
/// hex-encoded. Independent processes holding the same key always derive
/// the same identifier.
pub fn derive_key_id(public_key: &RsaPublicKey) -> String {
    let mut material = public_key.n().to_bytes_be();
    let exponent = public_key.e().to_bytes_be();
    material.push(exponent.last().copied().unwrap_or(0));

    let digest = Sha256::digest(&material);
    hex::encode(&digest[..KEY_ID_BYTES])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{KEY_1_ID, KEY_1_PEM, KEY_2_PEM, KEY_PKCS8_ID, KEY_PKCS8_PEM};
    use rsa::pkcs1::DecodeRsaPrivateKey;
    use rsa::pkcs8::DecodePrivateKey;
    use rsa::RsaPrivateKey;

    fn public_key(pem: &str) -> RsaPublicKey {
        RsaPrivateKey::from_pkcs1_pem(pem).unwrap().to_public_key()
    }

    #[test]
    fn test_key_id_is_24_hex_chars() {
        let kid = derive_key_id(&public_key(KEY_1_PEM));
        assert_eq!(kid.len(), 24);
        assert!(kid.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_key_id_is_deterministic() {
        let key = public_key(KEY_1_PEM);
        assert_eq!(derive_key_id(&key), derive_key_id(&key));
        assert_eq!(derive_key_id(&key), derive_key_id(&public_key(KEY_1_PEM)));
    }

    #[test]
    fn test_key_id_matches_known_value() {
        assert_eq!(derive_key_id(&public_key(KEY_1_PEM)), KEY_1_ID);

        let pkcs8 = RsaPrivateKey::from_pkcs8_pem(KEY_PKCS8_PEM).unwrap().to_public_key();
        assert_eq!(derive_key_id(&pkcs8), KEY_PKCS8_ID);
    }

    #[test]
    fn test_distinct_keys_get_distinct_ids() {
        assert_ne!(
            derive_key_id(&public_key(KEY_1_PEM)),
            derive_key_id(&public_key(KEY_2_PEM))
        );
    }
}
