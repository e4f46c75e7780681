use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, warn, Instrument};

use super::errors::LazyCacheError;
use super::options::LazyRefreshCacheOptions;
use super::raw_query::RawQuery;
use super::refresh_pool::RefreshPool;
use super::request_hash::request_hash;
use crate::application::ports::{CacheStore, DistributedLocker, LockError, LockToken};

/// What is written to the store: the value plus the time it was computed.
#[derive(Serialize)]
struct Envelope<'a, T> {
    refreshed_at: i64,
    value: &'a T,
}

#[derive(Deserialize)]
struct StoredEnvelope<T> {
    refreshed_at: i64,
    value: T,
}

/// Reads only the timestamp of a stored entry.
#[derive(Deserialize)]
struct EnvelopeHeader {
    refreshed_at: i64,
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

struct Inner<Req, Resp> {
    options: LazyRefreshCacheOptions,
    store: Arc<dyn CacheStore>,
    locker: Arc<dyn DistributedLocker>,
    pool: RefreshPool,
    query: Arc<dyn RawQuery<Req, Resp>>,
}

/// Read-through cache around one raw query.
///
/// `Req` is hashed into the cache key and handed to the raw query, `Resp` is
/// stored as JSON. Cloning shares the same cache.
pub struct LazyRefreshCache<Req, Resp> {
    inner: Arc<Inner<Req, Resp>>,
}

impl<Req, Resp> Clone for LazyRefreshCache<Req, Resp> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<Req, Resp> LazyRefreshCache<Req, Resp>
where
    Req: Serialize + Clone + Send + Sync + 'static,
    Resp: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    pub fn builder(options: LazyRefreshCacheOptions) -> LazyRefreshCacheBuilder<Req, Resp> {
        LazyRefreshCacheBuilder::new(options)
    }

    pub fn options(&self) -> &LazyRefreshCacheOptions {
        &self.inner.options
    }

    /// Returns the cached result for `request`, computing it on a miss.
    ///
    /// Every hit returns the cached value at once. Only a hit older than the
    /// refresh duration schedules a background refresh: a younger entry would
    /// be skipped under the lock anyway, so fresh hits skip the pool and the
    /// lock round trip. Failures of that refresh are only logged.
    ///
    /// On a miss the value computed by this caller is returned even if
    /// writing it to the store fails. A caller that waited for another
    /// holder's refresh reads the entry that holder wrote.
    pub async fn get(&self, request: &Req) -> Result<Resp, LazyCacheError> {
        let hash = request_hash(request).map_err(LazyCacheError::Hash)?;
        let data_key = self.inner.options.data_key(&hash);
        let requested_at = now_millis();

        match self.inner.store.get(&data_key).await {
            Ok(bytes) => match serde_json::from_slice::<StoredEnvelope<Resp>>(&bytes) {
                Ok(entry) => {
                    if self.is_stale(entry.refreshed_at, requested_at) {
                        self.schedule_refresh(hash, request.clone());
                    }
                    return Ok(entry.value);
                }
                Err(e) => {
                    warn!(
                        prefix = %self.inner.options.key_prefix,
                        hash = %hash,
                        error = %e,
                        "Undecodable cache entry, recomputing"
                    );
                }
            },
            Err(e) if e.is_not_found() => {
                debug!(prefix = %self.inner.options.key_prefix, hash = %hash, "Cache miss");
            }
            Err(e) => {
                warn!(
                    prefix = %self.inner.options.key_prefix,
                    hash = %hash,
                    error = %e,
                    "Cache read failed, recomputing"
                );
            }
        }

        if let Some(response) =
            refresh_cache(&self.inner, &hash, request.clone(), requested_at).await?
        {
            return Ok(response);
        }

        match self.inner.store.get(&data_key).await {
            Ok(bytes) => serde_json::from_slice::<StoredEnvelope<Resp>>(&bytes)
                .map(|entry| entry.value)
                .map_err(LazyCacheError::Decode),
            Err(e) if e.is_not_found() => Err(LazyCacheError::Missing { key: data_key }),
            Err(e) => Err(e.into()),
        }
    }

    /// Like [`get`](Self::get), but a missing request returns `Ok(None)`
    /// without touching the store or the raw query.
    pub async fn get_optional(&self, request: Option<&Req>) -> Result<Option<Resp>, LazyCacheError> {
        match request {
            Some(request) => self.get(request).await.map(Some),
            None => Ok(None),
        }
    }

    fn is_stale(&self, refreshed_at: i64, now: i64) -> bool {
        now.saturating_sub(refreshed_at) >= self.refresh_millis()
    }

    fn refresh_millis(&self) -> i64 {
        refresh_millis(&self.inner.options)
    }

    fn schedule_refresh(&self, hash: String, request: Req) {
        let inner = Arc::clone(&self.inner);
        let span = info_span!(
            "lazy_cache_refresh",
            prefix = %self.inner.options.key_prefix,
            hash = %hash
        );
        let requested_at = now_millis();

        let scheduled = self.inner.pool.spawn(
            async move {
                if let Err(e) = refresh_cache(&inner, &hash, request, requested_at).await {
                    warn!(error = %e, "Background cache refresh failed");
                }
            }
            .instrument(span),
        );

        if !scheduled {
            debug!(prefix = %self.inner.options.key_prefix, "Background refresh skipped");
        }
    }
}

fn refresh_millis(options: &LazyRefreshCacheOptions) -> i64 {
    i64::try_from(options.refresh_duration.as_millis()).unwrap_or(i64::MAX)
}

/// Takes the refresh lock of one entry.
///
/// Waits past the locker's own limit until one lease has elapsed; the
/// holder's lease has expired by then.
async fn acquire_refresh_lock<Req, Resp>(
    inner: &Inner<Req, Resp>,
    lock_key: &str,
) -> Result<LockToken, LazyCacheError> {
    let lease = inner.options.refresh_duration;
    let started = Instant::now();
    loop {
        match inner.locker.lock(lock_key, lease).await {
            Ok(token) => return Ok(token),
            Err(LockError::Timeout { .. }) if started.elapsed() < lease => {
                debug!(
                    key = %lock_key,
                    waited_ms = started.elapsed().as_millis() as u64,
                    "Still waiting for refresh lock"
                );
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Recomputes one entry while holding its lock.
///
/// Returns the computed value, or `None` when another holder refreshed the
/// entry first.
async fn refresh_cache<Req, Resp>(
    inner: &Inner<Req, Resp>,
    hash: &str,
    request: Req,
    requested_at: i64,
) -> Result<Option<Resp>, LazyCacheError>
where
    Resp: Serialize,
{
    let lock_key = inner.options.lock_key(hash);
    let token = acquire_refresh_lock(inner, &lock_key).await?;

    let result = refresh_locked(inner, hash, request, requested_at).await;

    if let Err(e) = inner.locker.unlock(&token).await {
        warn!(key = %lock_key, error = %e, "Failed to release cache refresh lock");
    }
    result
}

async fn refresh_locked<Req, Resp>(
    inner: &Inner<Req, Resp>,
    hash: &str,
    request: Req,
    requested_at: i64,
) -> Result<Option<Resp>, LazyCacheError>
where
    Resp: Serialize,
{
    let data_key = inner.options.data_key(hash);

    // Another holder may have refreshed the entry while we waited.
    if let Ok(bytes) = inner.store.get(&data_key).await {
        if let Ok(header) = serde_json::from_slice::<EnvelopeHeader>(&bytes) {
            let age = now_millis().saturating_sub(header.refreshed_at);
            if header.refreshed_at >= requested_at || age < refresh_millis(&inner.options) {
                debug!(key = %data_key, age_ms = age, "Cache entry already fresh");
                return Ok(None);
            }
        }
    }

    let started = Instant::now();
    let response = inner
        .query
        .query(request)
        .await
        .map_err(LazyCacheError::Query)?;

    let envelope = Envelope {
        refreshed_at: now_millis(),
        value: &response,
    };
    let bytes = serde_json::to_vec(&envelope).map_err(LazyCacheError::Encode)?;
    match inner.store.set(&data_key, bytes, inner.options.ttl()).await {
        Ok(()) => debug!(
            key = %data_key,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Cache entry refreshed"
        ),
        Err(e) => warn!(key = %data_key, error = %e, "Failed to write cache entry"),
    }
    Ok(Some(response))
}

/// Assembles a [`LazyRefreshCache`], validating its options.
pub struct LazyRefreshCacheBuilder<Req, Resp> {
    options: LazyRefreshCacheOptions,
    store: Option<Arc<dyn CacheStore>>,
    locker: Option<Arc<dyn DistributedLocker>>,
    pool: Option<RefreshPool>,
    query: Option<Arc<dyn RawQuery<Req, Resp>>>,
    _marker: PhantomData<fn(Req) -> Resp>,
}

impl<Req, Resp> LazyRefreshCacheBuilder<Req, Resp>
where
    Req: Serialize + Clone + Send + Sync + 'static,
    Resp: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(options: LazyRefreshCacheOptions) -> Self {
        Self {
            options,
            store: None,
            locker: None,
            pool: None,
            query: None,
            _marker: PhantomData,
        }
    }

    pub fn store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn locker(mut self, locker: Arc<dyn DistributedLocker>) -> Self {
        self.locker = Some(locker);
        self
    }

    pub fn pool(mut self, pool: RefreshPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn raw_query<Q>(mut self, query: Q) -> Self
    where
        Q: RawQuery<Req, Resp> + 'static,
    {
        self.query = Some(Arc::new(query));
        self
    }

    pub fn build(self) -> Result<LazyRefreshCache<Req, Resp>, LazyCacheError> {
        self.options.validate()?;

        let missing = |what: &str| {
            LazyCacheError::InvalidArguments(format!(
                "{}: {} is required",
                self.options.key_prefix, what
            ))
        };
        let store = self.store.clone().ok_or_else(|| missing("cache store"))?;
        let locker = self.locker.clone().ok_or_else(|| missing("locker"))?;
        let query = self.query.clone().ok_or_else(|| missing("raw query"))?;
        let pool = self.pool.clone().unwrap_or_default();

        Ok(LazyRefreshCache {
            inner: Arc::new(Inner {
                options: self.options,
                store,
                locker,
                pool,
                query,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::cache::QueryError;
    use crate::infrastructure::cache::{MemoryCacheStore, MemoryLocker};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn options(refresh: Duration) -> LazyRefreshCacheOptions {
        LazyRefreshCacheOptions::new("test", Duration::from_secs(60), refresh)
    }

    fn counting_cache(
        calls: Arc<AtomicUsize>,
        refresh: Duration,
    ) -> LazyRefreshCache<String, String> {
        LazyRefreshCache::builder(options(refresh))
            .store(Arc::new(MemoryCacheStore::new()))
            .locker(Arc::new(MemoryLocker::default()))
            .raw_query(move |req: String| {
                let calls = Arc::clone(&calls);
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    Ok::<_, QueryError>(format!("{}#{}", req, n))
                }
            })
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_cold_get_computes_and_caches() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = counting_cache(Arc::clone(&calls), Duration::from_secs(30));

        assert_eq!(cache.get(&"a".to_string()).await.unwrap(), "a#1");
        assert_eq!(cache.get(&"a".to_string()).await.unwrap(), "a#1");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_requests_use_distinct_entries() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = counting_cache(Arc::clone(&calls), Duration::from_secs(30));

        assert_eq!(cache.get(&"a".to_string()).await.unwrap(), "a#1");
        assert_eq!(cache.get(&"b".to_string()).await.unwrap(), "b#2");
    }

    #[tokio::test]
    async fn test_get_optional_none_skips_query() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = counting_cache(Arc::clone(&calls), Duration::from_secs(30));

        assert_eq!(cache.get_optional(None).await.unwrap(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_build_requires_raw_query() {
        let result = LazyRefreshCache::<String, String>::builder(options(Duration::from_secs(1)))
            .store(Arc::new(MemoryCacheStore::new()))
            .locker(Arc::new(MemoryLocker::default()))
            .build();
        assert!(matches!(result, Err(LazyCacheError::InvalidArguments(_))));
    }

    #[tokio::test]
    async fn test_cold_query_failure_propagates() {
        let cache = LazyRefreshCache::<String, String>::builder(options(Duration::from_secs(1)))
            .store(Arc::new(MemoryCacheStore::new()))
            .locker(Arc::new(MemoryLocker::default()))
            .raw_query(|_req: String| async { Err::<String, QueryError>("boom".into()) })
            .build()
            .unwrap();

        let err = cache.get(&"a".to_string()).await.unwrap_err();
        assert!(matches!(err, LazyCacheError::Query(_)));
    }

    #[derive(Clone)]
    struct Unhashable;

    impl Serialize for Unhashable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("not hashable"))
        }
    }

    #[tokio::test]
    async fn test_hash_failure_skips_query() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let cache = LazyRefreshCache::<Unhashable, String>::builder(options(Duration::from_secs(1)))
            .store(Arc::new(MemoryCacheStore::new()))
            .locker(Arc::new(MemoryLocker::default()))
            .raw_query(move |_req: Unhashable| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, QueryError>("computed".to_string())
                }
            })
            .build()
            .unwrap();

        let err = cache.get(&Unhashable).await.unwrap_err();
        assert!(matches!(err, LazyCacheError::Hash(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_waiter_outlasts_locker_wait_limit() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let cache = LazyRefreshCache::<String, String>::builder(options(Duration::from_secs(5)))
            .store(Arc::new(MemoryCacheStore::new()))
            .locker(Arc::new(MemoryLocker::new(
                Duration::from_millis(10),
                Duration::from_millis(200),
            )))
            .raw_query(move |req: String| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    Ok::<_, QueryError>(format!("slow:{}", req))
                }
            })
            .build()
            .unwrap();

        let holder = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.get(&"x".to_string()).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let waiter = cache.get(&"x".to_string()).await.unwrap();
        assert_eq!(waiter, "slow:x");
        assert_eq!(holder.await.unwrap().unwrap(), "slow:x");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
