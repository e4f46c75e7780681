use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::application::ports::{CacheStore, CacheStoreError};

struct Entry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Process-local cache store, for single-instance deployments and tests.
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: DashMap<String, Entry>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }

    /// Purges expired entries every `interval` until the store is dropped.
    pub fn spawn_sweeper(store: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let store: Weak<Self> = Arc::downgrade(store);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(store) = store.upgrade() else {
                    break;
                };
                let purged = store.purge_expired();
                if purged > 0 {
                    debug!(purged, remaining = store.len(), "Swept expired cache entries");
                }
            }
        })
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Vec<u8>, CacheStoreError> {
        let now = Instant::now();
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => return Ok(entry.value.clone()),
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        }
        Err(CacheStoreError::NotFound(key.to_string()))
    }

    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<(), CacheStoreError> {
        let expires_at = ttl.map(|ttl| Instant::now() + ttl);
        self.entries
            .insert(key.to_string(), Entry { value, expires_at });
        Ok(())
    }
}
