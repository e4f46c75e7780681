use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum LockError {
    #[error("Timed out after {waited:?} waiting for lock {key}")]
    Timeout { key: String, waited: Duration },

    #[error("Lock backend error: {0}")]
    Backend(String),
}

/// Proof of ownership returned by [`DistributedLocker::lock`].
///
/// The random value makes release safe after a lease expired and another
/// holder took the key over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockToken {
    key: String,
    value: String,
}

impl LockToken {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Uuid::new_v4().to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Mutual exclusion shared by every process using the same backend.
#[async_trait]
pub trait DistributedLocker: Send + Sync {
    /// Waits until `key` is free, then holds it for at most `lease`.
    async fn lock(&self, key: &str, lease: Duration) -> Result<LockToken, LockError>;

    /// Releases the lock if `token` still owns it. Releasing an expired or
    /// taken-over lock is a no-op.
    async fn unlock(&self, token: &LockToken) -> Result<(), LockError>;
}
