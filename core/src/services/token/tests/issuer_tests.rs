//! Tests for token issuance

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use jsonwebtoken::{decode_header, Algorithm};
use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::entities::{Claims, TokenClass};
use crate::errors::TokenError;
use crate::services::token::{TokenIssuer, TokenServiceConfig};
use crate::testutil::{fixture_pool, pool_of, KEY_1_ID, KEY_1_PEM};

fn payload(token: &str) -> Claims {
    let segment = token.split('.').nth(1).expect("payload segment");
    let bytes = URL_SAFE_NO_PAD.decode(segment).expect("base64url payload");
    serde_json::from_slice(&bytes).expect("claims json")
}

fn issued_kids(issuer: &TokenIssuer, count: usize) -> Vec<String> {
    (0..count)
        .map(|_| {
            let token = issuer.issue(TokenClass::Access, "user-1").unwrap();
            decode_header(&token).unwrap().kid.unwrap()
        })
        .collect()
}

#[test]
fn test_header_names_algorithm_and_key() {
    let issuer = TokenIssuer::new(Arc::new(pool_of(&[KEY_1_PEM])), TokenServiceConfig::default());

    let token = issuer.issue(TokenClass::Access, "user-1").unwrap();
    let header = decode_header(&token).unwrap();

    assert_eq!(header.alg, Algorithm::RS256);
    assert_eq!(header.kid.as_deref(), Some(KEY_1_ID));
    assert_eq!(token.split('.').count(), 3);
}

#[test]
fn test_claims_carry_class_subject_and_lifetime() {
    let issuer = TokenIssuer::new(fixture_pool(), TokenServiceConfig::default());

    let access = payload(&issuer.issue(TokenClass::Access, "alice").unwrap());
    assert_eq!(access.token_type, TokenClass::Access);
    assert_eq!(access.user_id, "alice");
    assert_eq!(access.exp - access.iat, 900);
    assert!(access.iss.is_none());

    let refresh = payload(&issuer.issue(TokenClass::Refresh, "alice").unwrap());
    assert_eq!(refresh.token_type, TokenClass::Refresh);
    assert_eq!(refresh.exp - refresh.iat, 604800);
}

#[test]
fn test_registered_claims_from_config() {
    let config = TokenServiceConfig {
        issuer: Some("jwks-rsa".to_string()),
        audience: Some("api".to_string()),
        ..TokenServiceConfig::default()
    };
    let issuer = TokenIssuer::new(fixture_pool(), config);

    let claims = payload(&issuer.issue(TokenClass::Access, "bob").unwrap());
    assert_eq!(claims.iss.as_deref(), Some("jwks-rsa"));
    assert_eq!(claims.aud.as_deref(), Some("api"));
}

#[test]
fn test_out_of_range_lifetime_fails_without_panicking() {
    let config = TokenServiceConfig {
        access_token_expiry_secs: i64::MAX,
        ..TokenServiceConfig::default()
    };
    let issuer = TokenIssuer::new(fixture_pool(), config);

    let err = issuer.issue(TokenClass::Access, "dave").unwrap_err();
    assert!(matches!(err, TokenError::SigningFailed { .. }));
    assert!(issuer.issue(TokenClass::Refresh, "dave").is_ok());
    assert!(issuer.issue_pair("dave").is_err());
}

#[test]
fn test_issue_pair() {
    let issuer = TokenIssuer::new(fixture_pool(), TokenServiceConfig::default());

    let pair = issuer.issue_pair("carol").unwrap();

    assert_eq!(pair.token_type, "Bearer");
    assert_eq!(pair.expires_in, 900);
    assert_ne!(pair.access_token, pair.refresh_token);
    assert_eq!(payload(&pair.access_token).token_type, TokenClass::Access);
    assert_eq!(payload(&pair.refresh_token).token_type, TokenClass::Refresh);
}

#[test]
fn test_seeded_selection_is_reproducible() {
    let first = TokenIssuer::with_rng(fixture_pool(), TokenServiceConfig::default(), StdRng::seed_from_u64(7));
    let second = TokenIssuer::with_rng(fixture_pool(), TokenServiceConfig::default(), StdRng::seed_from_u64(7));

    assert_eq!(issued_kids(&first, 20), issued_kids(&second, 20));
}

#[test]
fn test_constant_rng_always_picks_first_key() {
    let pool = fixture_pool();
    let first_kid = pool.ids()[0].to_string();
    let issuer = TokenIssuer::with_rng(pool, TokenServiceConfig::default(), StepRng::new(0, 0));

    assert!(issued_kids(&issuer, 5).iter().all(|kid| *kid == first_kid));
}

#[test]
fn test_selected_key_is_always_in_pool() {
    let pool = fixture_pool();
    let issuer = TokenIssuer::new(pool.clone(), TokenServiceConfig::default());

    for kid in issued_kids(&issuer, 30) {
        assert!(pool.lookup(&kid).is_some());
    }
}

#[test]
fn test_concurrent_issuance() {
    let issuer = Arc::new(TokenIssuer::new(fixture_pool(), TokenServiceConfig::default()));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let issuer = issuer.clone();
            std::thread::spawn(move || issuer.issue_pair(&format!("user-{}", i)).unwrap())
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let pair = handle.join().unwrap();
        assert_eq!(payload(&pair.access_token).user_id, format!("user-{}", i));
    }
}
