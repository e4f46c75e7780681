use std::time::{Duration, Instant};

use async_trait::async_trait;
use deadpool_redis::Pool;
use tracing::{debug, error};

use super::redis_cache_store::px_millis;
use crate::application::ports::{DistributedLocker, LockError, LockToken};

/// Deletes the key only while it still holds our token.
const UNLOCK_SCRIPT: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
else
    return 0
end
"#;

/// Lease lock on a shared Redis, excluding holders across processes.
///
/// Acquired with `SET key token NX PX lease`; waiters poll until the key is
/// released or the lease expires.
#[derive(Clone)]
pub struct RedisLocker {
    pool: Pool,
    poll_interval: Duration,
    max_wait: Duration,
}

impl RedisLocker {
    pub fn new(pool: Pool, poll_interval: Duration, max_wait: Duration) -> Self {
        Self {
            pool,
            poll_interval,
            max_wait,
        }
    }

    async fn try_acquire(&self, token: &LockToken, lease: Duration) -> Result<bool, LockError> {
        let mut conn = self.pool.get().await.map_err(|e| {
            error!("Failed to get Redis connection: {}", e);
            LockError::Backend(e.to_string())
        })?;

        let reply: Option<String> = redis::cmd("SET")
            .arg(token.key())
            .arg(token.value())
            .arg("NX")
            .arg("PX")
            .arg(px_millis(lease))
            .query_async(&mut conn)
            .await
            .map_err(|e| LockError::Backend(e.to_string()))?;

        Ok(reply.is_some())
    }
}

#[async_trait]
impl DistributedLocker for RedisLocker {
    async fn lock(&self, key: &str, lease: Duration) -> Result<LockToken, LockError> {
        let token = LockToken::new(key);
        let started = Instant::now();

        loop {
            if self.try_acquire(&token, lease).await? {
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
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| LockError::Backend(e.to_string()))?;

        let released: i64 = redis::cmd("EVAL")
            .arg(UNLOCK_SCRIPT)
            .arg(1)
            .arg(token.key())
            .arg(token.value())
            .query_async(&mut conn)
            .await
            .map_err(|e| LockError::Backend(e.to_string()))?;

        if released == 0 {
            debug!(key = %token.key(), "Lock already expired or taken over");
        }
        Ok(())
    }
}
