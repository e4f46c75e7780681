use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::{Connection, Pool};
use tracing::error;

use crate::application::ports::{CacheStore, CacheStoreError};

/// Cache store backed by a shared Redis instance.
#[derive(Clone)]
pub struct RedisCacheStore {
    pool: Pool,
}

impl RedisCacheStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn connection(&self) -> Result<Connection, CacheStoreError> {
        self.pool.get().await.map_err(|e| {
            error!("Failed to get Redis connection: {}", e);
            CacheStoreError::Backend(e.to_string())
        })
    }
}

/// Milliseconds for `PX`, never below one.
pub(crate) fn px_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Result<Vec<u8>, CacheStoreError> {
        let mut conn = self.connection().await?;
        let value: Option<Vec<u8>> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheStoreError::Backend(e.to_string()))?;

        value.ok_or_else(|| CacheStoreError::NotFound(key.to_string()))
    }

    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<(), CacheStoreError> {
        let mut conn = self.connection().await?;
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);
        if let Some(ttl) = ttl {
            cmd.arg("PX").arg(px_millis(ttl));
        }

        cmd.query_async::<()>(&mut conn)
            .await
            .map_err(|e| CacheStoreError::Backend(e.to_string()))
    }
}
