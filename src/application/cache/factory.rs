use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use super::errors::LazyCacheError;
use super::lazy_refresh::LazyRefreshCache;
use super::options::LazyRefreshCacheOptions;
use super::raw_query::RawQuery;
use super::refresh_pool::RefreshPool;
use crate::application::ports::{CacheStore, DistributedLocker};

/// Shared dependencies of every lazy-refresh cache in the process.
#[derive(Clone)]
pub struct LazyRefreshCacheFactory {
    store: Arc<dyn CacheStore>,
    locker: Arc<dyn DistributedLocker>,
    pool: RefreshPool,
    namespace: String,
}

impl LazyRefreshCacheFactory {
    pub fn new(
        store: Arc<dyn CacheStore>,
        locker: Arc<dyn DistributedLocker>,
        pool: RefreshPool,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            store,
            locker,
            pool,
            namespace: namespace.into(),
        }
    }

    pub fn pool(&self) -> &RefreshPool {
        &self.pool
    }

    /// Builds a cache whose keys live under `<namespace>:<key_prefix>`.
    pub fn create<Req, Resp, Q>(
        &self,
        mut options: LazyRefreshCacheOptions,
        query: Q,
    ) -> Result<LazyRefreshCache<Req, Resp>, LazyCacheError>
    where
        Req: Serialize + Clone + Send + Sync + 'static,
        Resp: Serialize + DeserializeOwned + Send + Sync + 'static,
        Q: RawQuery<Req, Resp> + 'static,
    {
        options.validate()?;
        if !self.namespace.is_empty() {
            options.key_prefix = format!("{}:{}", self.namespace, options.key_prefix);
        }

        info!(
            prefix = %options.key_prefix,
            expiration = ?options.expiration,
            refresh = ?options.refresh_duration,
            "Creating lazy refresh cache"
        );

        LazyRefreshCache::builder(options)
            .store(Arc::clone(&self.store))
            .locker(Arc::clone(&self.locker))
            .pool(self.pool.clone())
            .raw_query(query)
            .build()
    }
}
