use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use crate::application::ports::{DistributedLocker, LockError, LockToken};

struct Lease {
    value: String,
    expires_at: Instant,
}

/// In-process lease lock with the same semantics as the Redis lock.
///
/// Only excludes callers within one process.
pub struct MemoryLocker {
    leases: DashMap<String, Lease>,
    poll_interval: Duration,
    max_wait: Duration,
}

impl MemoryLocker {
    pub fn new(poll_interval: Duration, max_wait: Duration) -> Self {
        Self {
            leases: DashMap::new(),
            poll_interval,
            max_wait,
        }
    }

    fn try_acquire(&self, token: &LockToken, lease: Duration) -> bool {
        let now = Instant::now();
        let new_lease = Lease {
            value: token.value().to_string(),
            expires_at: now + lease,
        };

        match self.leases.entry(token.key().to_string()) {
            Entry::Occupied(mut held) if held.get().expires_at <= now => {
                held.insert(new_lease);
                true
            }
            Entry::Occupied(_) => false,
            Entry::Vacant(free) => {
                free.insert(new_lease);
                true
            }
        }
    }
}

impl Default for MemoryLocker {
    fn default() -> Self {
        Self::new(Duration::from_millis(10), Duration::from_secs(30))
    }
}

#[async_trait]
impl DistributedLocker for MemoryLocker {
    async fn lock(&self, key: &str, lease: Duration) -> Result<LockToken, LockError> {
        let token = LockToken::new(key);
        let started = Instant::now();

        loop {
            if self.try_acquire(&token, lease) {
                return Ok(token);
            }

            let waited = started.elapsed();
            if waited >= self.max_wait {
                return Err(LockError::Timeout {
                    key: key.to_string(),
                    waited,
                });
            }
            debug!(key = %key, "Lock held, waiting");
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn unlock(&self, token: &LockToken) -> Result<(), LockError> {
        self.leases
            .remove_if(token.key(), |_, lease| lease.value == token.value());
        Ok(())
    }
}
