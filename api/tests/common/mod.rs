//! Shared setup for API integration tests

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use jr_api::AppState;
use jr_core::services::auth::{AuthService, AuthServiceConfig};
use jr_core::services::token::{
    KeySetPublisher, LocalKeySet, TokenIssuer, TokenServiceConfig, TokenVerifier,
};
use jr_core::testutil::{fixture_pool, TestStore};

/// App state over the fixture key pool, verifying against the local key set
pub fn test_state() -> web::Data<AppState> {
    let pool = fixture_pool();
    let publisher = Arc::new(KeySetPublisher::new(pool.clone(), Arc::new(TestStore::new())));
    let issuer = Arc::new(TokenIssuer::new(pool, TokenServiceConfig::default()));
    let verifier = Arc::new(TokenVerifier::new(Arc::new(LocalKeySet::new(publisher.clone()))));
    let auth_service = Arc::new(AuthService::new(
        Arc::new(TestStore::new()),
        issuer,
        verifier.clone(),
        AuthServiceConfig::default().with_bcrypt_cost(4),
    ));

    web::Data::new(AppState {
        auth_service,
        publisher,
        verifier,
    })
}

/// Token issuer over the same fixture pool as [`test_state`]
pub fn fixture_issuer() -> TokenIssuer {
    TokenIssuer::new(fixture_pool(), TokenServiceConfig::default())
}
