use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{error, info};

use jr_api::telemetry::init_tracing;
use jr_api::{create_app, AppState};
use jr_core::services::auth::{AuthService, AuthServiceConfig};
use jr_core::services::token::{
    KeyPool, KeySetPublisher, KeySetSource, KeySource, LocalKeySet, TokenIssuer,
    TokenServiceConfig, TokenVerifier,
};
use jr_infra::{MemoryStore, RefreshPolicy, RemoteKeySet};
use jr_shared::config::{AppConfig, KeySetSourceKind};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(&config.logging);
    info!(environment = %config.environment, "Starting JWKS-RSA API server");

    let sources = KeySource::from_env_vars(&config.auth.keys.key_vars);
    let pool = match KeyPool::load(&sources) {
        Ok(pool) => Arc::new(pool),
        Err(e) => {
            error!(error = %e, "Cannot start without signing keys");
            return Err(e).context("Failed to load signing keys");
        }
    };
    info!(keys = pool.len(), "Signing key pool ready");

    let key_set_cache = Arc::new(MemoryStore::new());
    let user_store = Arc::new(MemoryStore::new());
    let publisher = Arc::new(KeySetPublisher::new(pool.clone(), key_set_cache));
    let issuer = Arc::new(TokenIssuer::new(
        pool,
        TokenServiceConfig::from(&config.auth.jwt),
    ));

    let discovery = &config.auth.discovery;
    let source: Arc<dyn KeySetSource> = match discovery.source {
        KeySetSourceKind::Local => Arc::new(LocalKeySet::new(publisher.clone())),
        KeySetSourceKind::Remote => {
            info!(url = %discovery.jwks_url, "Verifying against remote key set");
            Arc::new(
                RemoteKeySet::new(discovery.jwks_url.clone(), RefreshPolicy::from(discovery))
                    .context("Failed to build key set HTTP client")?,
            )
        }
    };
    let verifier = Arc::new(
        TokenVerifier::new(source).with_fetch_timeout(Duration::from_secs(discovery.fetch_timeout)),
    );

    let auth_service = Arc::new(AuthService::new(
        user_store,
        issuer,
        verifier.clone(),
        AuthServiceConfig::default(),
    ));

    let state = web::Data::new(AppState {
        auth_service,
        publisher,
        verifier,
    });

    let bind_address = config.server.bind_address();
    info!(address = %bind_address, "Server will bind");

    let mut server = HttpServer::new(move || create_app(state.clone()));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await
        .context("Server terminated with an error")
}
