//! Key set fetched from a remote JWKS endpoint

use std::time::Duration;

use async_trait::async_trait;
use jr_core::domain::entities::KeySetDocument;
use jr_core::errors::TokenError;
use jr_core::services::token::KeySetSource;
use jr_shared::config::DiscoveryConfig;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::InfrastructureError;

/// When a cached remote key set goes stale, and how long a fetch may take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    /// Age after which the cached document is refetched
    pub refresh_interval: Duration,
    /// Upper bound on one fetch, connect to last byte
    pub fetch_timeout: Duration,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(300),
            fetch_timeout: Duration::from_secs(5),
        }
    }
}

impl From<&DiscoveryConfig> for RefreshPolicy {
    fn from(config: &DiscoveryConfig) -> Self {
        Self {
            refresh_interval: Duration::from_secs(config.refresh_interval),
            fetch_timeout: Duration::from_secs(config.fetch_timeout),
        }
    }
}

struct CachedKeySet {
    document: KeySetDocument,
    fetched_at: Instant,
}

/// Key set source backed by an HTTP JWKS endpoint.
///
/// The last good document is kept until `refresh_interval` has elapsed.
/// Every failure to obtain a document is reported as
/// [`TokenError::KeySetUnavailable`]; nothing is verified against a
/// document that could not be fetched.
pub struct RemoteKeySet {
    client: reqwest::Client,
    url: String,
    policy: RefreshPolicy,
    cached: RwLock<Option<CachedKeySet>>,
}

impl RemoteKeySet {
    /// Creates a source for `url` with its own HTTP client
    pub fn new(url: impl Into<String>, policy: RefreshPolicy) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(policy.fetch_timeout)
            .build()?;
        Ok(Self::with_client(client, url, policy))
    }

    /// Creates a source sharing an existing HTTP client
    pub fn with_client(client: reqwest::Client, url: impl Into<String>, policy: RefreshPolicy) -> Self {
        Self {
            client,
            url: url.into(),
            policy,
            cached: RwLock::new(None),
        }
    }

    async fn fetch(&self) -> Result<KeySetDocument, InfrastructureError> {
        let request = async {
            let response = self.client.get(&self.url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(InfrastructureError::Status {
                    status: status.as_u16(),
                });
            }
            let body = response.bytes().await?;
            Ok(serde_json::from_slice::<KeySetDocument>(&body)?)
        };

        tokio::time::timeout(self.policy.fetch_timeout, request)
            .await
            .map_err(|_| InfrastructureError::Timeout(self.policy.fetch_timeout))?
    }

    async fn fetch_and_store(&self) -> Result<KeySetDocument, TokenError> {
        match self.fetch().await {
            Ok(document) => {
                info!(url = %self.url, keys = document.keys.len(), "Fetched remote key set");
                *self.cached.write().await = Some(CachedKeySet {
                    document: document.clone(),
                    fetched_at: Instant::now(),
                });
                Ok(document)
            }
            Err(e) => {
                warn!(url = %self.url, error = %e, "Remote key set unavailable");
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl KeySetSource for RemoteKeySet {
    async fn key_set(&self) -> Result<KeySetDocument, TokenError> {
        if let Some(cached) = self.cached.read().await.as_ref() {
            if cached.fetched_at.elapsed() < self.policy.refresh_interval {
                debug!(url = %self.url, "Remote key set served from cache");
                return Ok(cached.document.clone());
            }
        }
        self.fetch_and_store().await
    }

    async fn refresh(&self) -> Result<KeySetDocument, TokenError> {
        self.fetch_and_store().await
    }
}
