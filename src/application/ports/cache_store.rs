use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheStoreError {
    #[error("Cache key not found: {0}")]
    NotFound(String),

    #[error("Cache backend error: {0}")]
    Backend(String),
}

impl CacheStoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheStoreError::NotFound(_))
    }
}

/// Shared key-value store holding serialized cache entries.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns `CacheStoreError::NotFound` for missing or expired keys.
    async fn get(&self, key: &str) -> Result<Vec<u8>, CacheStoreError>;

    /// Stores `value` under `key`. A `ttl` of `None` never expires.
    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<(), CacheStoreError>;
}
