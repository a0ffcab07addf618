//! Tests for key set publishing

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use crate::domain::entities::KeySetDocument;
use crate::repositories::KeyValueStore;
use crate::services::token::{KeySetPublisher, JWKS_CACHE_KEY};
use crate::testutil::{fixture_pool, TestStore};

#[test]
fn test_document_lists_every_pool_key() {
    let pool = fixture_pool();
    let publisher = KeySetPublisher::new(pool.clone(), Arc::new(TestStore::new()));

    let document = publisher.publish();

    assert_eq!(document.keys.len(), pool.len());
    assert_eq!(document.key_ids(), pool.ids());
    for jwk in &document.keys {
        assert_eq!(jwk.kty, "RSA");
        assert_eq!(jwk.alg, "RS256");
        assert_eq!(jwk.key_use, "sig");
        assert_eq!(jwk.e, "AQAB");
        assert_eq!(URL_SAFE_NO_PAD.decode(&jwk.n).unwrap().len(), 256);
    }
}

#[test]
fn test_second_publish_is_served_from_cache() {
    let store = Arc::new(TestStore::new());
    let publisher = KeySetPublisher::new(fixture_pool(), store.clone());

    let first = publisher.publish();
    let second = publisher.publish();

    assert_eq!(first, second);
    assert_eq!(store.set_count(), 1);
    assert_eq!(store.get_count(), 2);
}

#[test]
fn test_cached_entry_is_the_serialized_document() {
    let store = Arc::new(TestStore::new());
    let publisher = KeySetPublisher::new(fixture_pool(), store.clone());

    let document = publisher.publish();
    let raw = store.raw(JWKS_CACHE_KEY).expect("cache populated");
    let cached: KeySetDocument = serde_json::from_str(&raw).unwrap();

    assert_eq!(cached, document);
    assert!(raw.contains("\"use\":\"sig\""));
}

#[test]
fn test_unreadable_cache_entry_is_recomputed() {
    let store = Arc::new(TestStore::new());
    store.set(JWKS_CACHE_KEY, "{ not json".to_string());
    let publisher = KeySetPublisher::new(fixture_pool(), store.clone());

    let document = publisher.publish();

    assert_eq!(document.keys.len(), 3);
    let repaired: KeySetDocument = serde_json::from_str(&store.raw(JWKS_CACHE_KEY).unwrap()).unwrap();
    assert_eq!(repaired, document);
}

#[test]
fn test_publishers_over_same_pool_agree() {
    let pool = fixture_pool();
    let a = KeySetPublisher::new(pool.clone(), Arc::new(TestStore::new()));
    let b = KeySetPublisher::new(pool, Arc::new(TestStore::new()));

    assert_eq!(a.publish(), b.publish());
}
