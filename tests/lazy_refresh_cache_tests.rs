//! Behavioural tests for the lazy-refresh cache over the in-process store
//! and locker.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use lesson_store::application::cache::{
    LazyCacheError, LazyRefreshCache, LazyRefreshCacheOptions, QueryError, RefreshPool,
    RefreshPoolConfig,
};
use lesson_store::application::ports::{CacheStore, CacheStoreError};
use lesson_store::infrastructure::cache::{MemoryCacheStore, MemoryLocker};

fn options(refresh: Duration) -> LazyRefreshCacheOptions {
    LazyRefreshCacheOptions::new("it", Duration::from_secs(60), refresh)
}

fn locker() -> Arc<MemoryLocker> {
    Arc::new(MemoryLocker::new(
        Duration::from_millis(5),
        Duration::from_secs(5),
    ))
}

/// Waits until the pool has finished `n` tasks.
async fn wait_completed(pool: &RefreshPool, n: u64) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while pool.stats().completed < n {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("refresh did not complete");
}

/// Store whose reads or writes can be switched to fail.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryCacheStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

#[async_trait]
impl CacheStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Vec<u8>, CacheStoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CacheStoreError::Backend("connection reset".to_string()));
        }
        self.inner.get(key).await
    }

    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<(), CacheStoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CacheStoreError::Backend("read-only replica".to_string()));
        }
        self.inner.set(key, value, ttl).await
    }
}

#[tokio::test]
async fn test_validate_rejects_bad_options() {
    for opts in [
        LazyRefreshCacheOptions::new("it", Duration::from_secs(60), Duration::ZERO),
        LazyRefreshCacheOptions::new("it", Duration::from_secs(5), Duration::from_secs(10)),
        LazyRefreshCacheOptions::new("", Duration::from_secs(60), Duration::from_secs(10)),
    ] {
        let result = LazyRefreshCache::<String, String>::builder(opts)
            .store(Arc::new(MemoryCacheStore::new()))
            .locker(locker())
            .raw_query(|req: String| async move { Ok::<_, QueryError>(req) })
            .build();
        assert!(matches!(result, Err(LazyCacheError::InvalidArguments(_))));
    }
}

#[tokio::test]
async fn test_zero_expiration_is_accepted() {
    let result = LazyRefreshCache::<String, String>::builder(LazyRefreshCacheOptions::new(
        "it",
        Duration::ZERO,
        Duration::from_secs(10),
    ))
    .store(Arc::new(MemoryCacheStore::new()))
    .locker(locker())
    .raw_query(|req: String| async move { Ok::<_, QueryError>(req) })
    .build();
    assert!(result.is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_cold_gets_run_query_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let cache = LazyRefreshCache::<String, String>::builder(options(Duration::from_secs(30)))
        .store(Arc::new(MemoryCacheStore::new()))
        .locker(locker())
        .raw_query(move |req: String| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok::<_, QueryError>(format!("computed:{}", req))
            }
        })
        .build()
        .unwrap();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let cache = cache.clone();
            tokio::spawn(async move { cache.get(&"same".to_string()).await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), "computed:same");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_warm_hit_does_not_wait_for_slow_refresh() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let cache = LazyRefreshCache::<String, String>::builder(options(Duration::from_millis(20)))
        .store(Arc::new(MemoryCacheStore::new()))
        .locker(locker())
        .raw_query(move |req: String| {
            let counter = Arc::clone(&counter);
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                if n > 0 {
                    tokio::time::sleep(Duration::from_secs(2)).await;
                }
                Ok::<_, QueryError>(format!("{}#{}", req, n))
            }
        })
        .build()
        .unwrap();

    assert_eq!(cache.get(&"a".to_string()).await.unwrap(), "a#0");
    tokio::time::sleep(Duration::from_millis(40)).await;

    let warm = tokio::time::timeout(Duration::from_millis(500), cache.get(&"a".to_string()))
        .await
        .expect("warm hit waited for the refresh");
    assert_eq!(warm.unwrap(), "a#0");
}

#[tokio::test]
async fn test_stale_hit_refreshes_in_background() {
    let pool = RefreshPool::default();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let cache = LazyRefreshCache::<String, String>::builder(options(Duration::from_millis(100)))
        .store(Arc::new(MemoryCacheStore::new()))
        .locker(locker())
        .pool(pool.clone())
        .raw_query(move |req: String| {
            let counter = Arc::clone(&counter);
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, QueryError>(format!("{}#{}", req, n))
            }
        })
        .build()
        .unwrap();

    let key = "a".to_string();
    assert_eq!(cache.get(&key).await.unwrap(), "a#0");

    // Fresh hit schedules nothing.
    assert_eq!(cache.get(&key).await.unwrap(), "a#0");
    assert_eq!(pool.stats().completed, 0);

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(cache.get(&key).await.unwrap(), "a#0");
    wait_completed(&pool, 1).await;

    assert_eq!(cache.get(&key).await.unwrap(), "a#1");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_background_failure_keeps_stale_value() {
    let pool = RefreshPool::default();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let cache = LazyRefreshCache::<String, String>::builder(options(Duration::from_millis(100)))
        .store(Arc::new(MemoryCacheStore::new()))
        .locker(locker())
        .pool(pool.clone())
        .raw_query(move |req: String| {
            let counter = Arc::clone(&counter);
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) > 0 {
                    return Err::<String, QueryError>("database gone".into());
                }
                Ok(format!("{}#ok", req))
            }
        })
        .build()
        .unwrap();

    let key = "a".to_string();
    assert_eq!(cache.get(&key).await.unwrap(), "a#ok");

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(cache.get(&key).await.unwrap(), "a#ok");
    wait_completed(&pool, 1).await;

    assert_eq!(cache.get(&key).await.unwrap(), "a#ok");
    assert!(calls.load(Ordering::SeqCst) >= 2);
}

#[tokio::test]
async fn test_store_read_failure_falls_through_to_query() {
    let store = Arc::new(FlakyStore::default());
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let cache = LazyRefreshCache::<String, String>::builder(options(Duration::from_secs(30)))
        .store(store.clone())
        .locker(locker())
        .raw_query(move |req: String| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, QueryError>(req.to_uppercase())
            }
        })
        .build()
        .unwrap();

    assert_eq!(cache.get(&"a".to_string()).await.unwrap(), "A");

    store.fail_reads.store(true, Ordering::SeqCst);
    assert_eq!(cache.get(&"a".to_string()).await.unwrap(), "A");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_store_write_failure_still_returns_computed_value() {
    let store = Arc::new(FlakyStore::default());
    store.fail_writes.store(true, Ordering::SeqCst);
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let cache = LazyRefreshCache::<String, String>::builder(options(Duration::from_secs(30)))
        .store(store.clone())
        .locker(locker())
        .raw_query(move |req: String| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, QueryError>(req.to_uppercase())
            }
        })
        .build()
        .unwrap();

    assert_eq!(cache.get(&"a".to_string()).await.unwrap(), "A");
    assert!(store.inner.is_empty());

    // Nothing was cached, so the next call computes again.
    assert_eq!(cache.get(&"a".to_string()).await.unwrap(), "A");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_none_request_short_circuits() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let cache = LazyRefreshCache::<String, String>::builder(options(Duration::from_secs(30)))
        .store(Arc::new(MemoryCacheStore::new()))
        .locker(locker())
        .raw_query(move |req: String| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, QueryError>(req)
            }
        })
        .build()
        .unwrap();

    let mut response = Some("untouched".to_string());
    if let Some(value) = cache.get_optional(None).await.unwrap() {
        response = Some(value);
    }

    assert_eq!(response.as_deref(), Some("untouched"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_saturated_pool_drops_refreshes() {
    let pool = RefreshPool::new(RefreshPoolConfig {
        max_concurrent: 1,
        max_lifetime: Duration::from_secs(5),
    });
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let cache = LazyRefreshCache::<String, String>::builder(options(Duration::from_millis(20)))
        .store(Arc::new(MemoryCacheStore::new()))
        .locker(locker())
        .pool(pool.clone())
        .raw_query(move |req: String| {
            let counter = Arc::clone(&counter);
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) >= 3 {
                    tokio::time::sleep(Duration::from_millis(500)).await;
                }
                Ok::<_, QueryError>(req)
            }
        })
        .build()
        .unwrap();

    let keys: Vec<String> = ["a", "b", "c"].iter().map(|k| k.to_string()).collect();
    for key in &keys {
        cache.get(key).await.unwrap();
    }
    tokio::time::sleep(Duration::from_millis(40)).await;

    for key in &keys {
        assert_eq!(&cache.get(key).await.unwrap(), key);
    }

    let stats = pool.stats();
    assert_eq!(stats.in_flight, 1);
    assert_eq!(stats.dropped, 2);

    assert!(pool.shutdown(Duration::from_secs(2)).await);
}
