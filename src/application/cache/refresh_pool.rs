use std::future::Future;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

/// Configuration for background cache refreshes.
#[derive(Debug, Clone)]
pub struct RefreshPoolConfig {
    /// Maximum number of refreshes running at once. Refreshes scheduled while
    /// the pool is full are dropped.
    pub max_concurrent: usize,

    /// Hard upper bound on a single refresh, lock wait included.
    pub max_lifetime: Duration,
}

impl Default for RefreshPoolConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 32,
            max_lifetime: Duration::from_secs(30),
        }
    }
}

/// Point-in-time counters of a [`RefreshPool`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshPoolStats {
    pub in_flight: usize,
    pub completed: u64,
    pub dropped: u64,
    pub timed_out: u64,
    pub cancelled: u64,
}

#[derive(Default)]
struct Counters {
    in_flight: AtomicUsize,
    completed: AtomicU64,
    dropped: AtomicU64,
    timed_out: AtomicU64,
    cancelled: AtomicU64,
}

struct Inner {
    config: RefreshPoolConfig,
    permits: Arc<Semaphore>,
    tracker: TaskTracker,
    cancel: CancellationToken,
    counters: Counters,
}

/// Bounded executor for fire-and-forget refresh tasks.
///
/// Each task holds a semaphore permit for its whole run and is aborted after
/// `max_lifetime`. Scheduling never waits: when no permit is free the task is
/// dropped and counted, since a later read will schedule another refresh.
/// Cloning shares the same pool.
#[derive(Clone)]
pub struct RefreshPool {
    inner: Arc<Inner>,
}

impl RefreshPool {
    pub fn new(config: RefreshPoolConfig) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_concurrent.max(1)));
        Self {
            inner: Arc::new(Inner {
                config,
                permits,
                tracker: TaskTracker::new(),
                cancel: CancellationToken::new(),
                counters: Counters::default(),
            }),
        }
    }

    /// Runs `task` in the background if a slot is free.
    ///
    /// Returns `false` when the task was dropped because the pool is full or
    /// shutting down.
    pub fn spawn<F>(&self, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let counters = &self.inner.counters;
        if self.inner.tracker.is_closed() {
            counters.dropped.fetch_add(1, Ordering::Relaxed);
            debug!("Refresh pool is shut down, dropping refresh");
            return false;
        }

        let permit = match Arc::clone(&self.inner.permits).try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                counters.dropped.fetch_add(1, Ordering::Relaxed);
                debug!(
                    max_concurrent = self.inner.config.max_concurrent,
                    "Refresh pool saturated, dropping refresh"
                );
                return false;
            }
        };

        counters.in_flight.fetch_add(1, Ordering::Relaxed);
        let inner = Arc::clone(&self.inner);
        self.inner.tracker.spawn(async move {
            let _permit = permit;
            let lifetime = inner.config.max_lifetime;

            tokio::select! {
                _ = inner.cancel.cancelled() => {
                    inner.counters.cancelled.fetch_add(1, Ordering::Relaxed);
                }
                result = tokio::time::timeout(lifetime, task) => match result {
                    Ok(()) => {
                        inner.counters.completed.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(_) => {
                        inner.counters.timed_out.fetch_add(1, Ordering::Relaxed);
                        warn!(lifetime = ?lifetime, "Background refresh exceeded its lifetime");
                    }
                },
            }

            inner.counters.in_flight.fetch_sub(1, Ordering::Relaxed);
        });

        true
    }

    pub fn stats(&self) -> RefreshPoolStats {
        let counters = &self.inner.counters;
        RefreshPoolStats {
            in_flight: counters.in_flight.load(Ordering::Relaxed),
            completed: counters.completed.load(Ordering::Relaxed),
            dropped: counters.dropped.load(Ordering::Relaxed),
            timed_out: counters.timed_out.load(Ordering::Relaxed),
            cancelled: counters.cancelled.load(Ordering::Relaxed),
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.tracker.is_closed()
    }

    /// Stops accepting tasks and waits up to `grace` for running ones, then
    /// cancels whatever is left.
    ///
    /// Returns `true` if every task finished within the grace period.
    pub async fn shutdown(&self, grace: Duration) -> bool {
        self.inner.tracker.close();
        info!(
            in_flight = self.inner.counters.in_flight.load(Ordering::Relaxed),
            "Shutting down refresh pool"
        );

        if tokio::time::timeout(grace, self.inner.tracker.wait())
            .await
            .is_ok()
        {
            return true;
        }

        warn!(grace = ?grace, "Refresh pool grace period elapsed, cancelling refreshes");
        self.inner.cancel.cancel();
        self.inner.tracker.wait().await;
        false
    }
}

impl Default for RefreshPool {
    fn default() -> Self {
        Self::new(RefreshPoolConfig::default())
    }
}
