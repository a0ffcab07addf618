//! Key set sources the verifier resolves key identifiers against

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::entities::KeySetDocument;
use crate::errors::TokenError;

use super::publisher::KeySetPublisher;

/// Capability to produce a key set for verification.
///
/// Implementations that fetch over the network fail closed: any failure is
/// reported as [`TokenError::KeySetUnavailable`].
#[async_trait]
pub trait KeySetSource: Send + Sync {
    /// Current key set, possibly cached
    async fn key_set(&self) -> Result<KeySetDocument, TokenError>;

    /// Key set bypassing any cache the source keeps
    async fn refresh(&self) -> Result<KeySetDocument, TokenError> {
        self.key_set().await
    }
}

/// Key set read from the in-process pool through its publisher
pub struct LocalKeySet {
    publisher: Arc<KeySetPublisher>,
}

impl LocalKeySet {
    /// Creates a source backed by `publisher`
    pub fn new(publisher: Arc<KeySetPublisher>) -> Self {
        Self { publisher }
    }
}

#[async_trait]
impl KeySetSource for LocalKeySet {
    async fn key_set(&self) -> Result<KeySetDocument, TokenError> {
        Ok(self.publisher.publish())
    }
}

/// Key set handed over directly by the caller
#[derive(Debug, Clone)]
pub struct StaticKeySet {
    document: KeySetDocument,
}

impl StaticKeySet {
    /// Wraps an existing document
    pub fn new(document: KeySetDocument) -> Self {
        Self { document }
    }
}

#[async_trait]
impl KeySetSource for StaticKeySet {
    async fn key_set(&self) -> Result<KeySetDocument, TokenError> {
        Ok(self.document.clone())
    }
}
