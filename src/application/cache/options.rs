use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::errors::LazyCacheError;

const KEY_ROOT: &str = "lazy_refresh_cache";

/// Per-query cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LazyRefreshCacheOptions {
    /// Namespace of every key this cache writes.
    pub key_prefix: String,
    /// Entry TTL in the store. Zero never expires.
    pub expiration: Duration,
    /// Age after which a hit triggers a background refresh. Also the lock
    /// lease of a refresh.
    pub refresh_duration: Duration,
}

impl LazyRefreshCacheOptions {
    pub fn new(key_prefix: impl Into<String>, expiration: Duration, refresh_duration: Duration) -> Self {
        Self {
            key_prefix: key_prefix.into(),
            expiration,
            refresh_duration,
        }
    }

    pub fn validate(&self) -> Result<(), LazyCacheError> {
        if self.key_prefix.trim().is_empty() {
            return Err(LazyCacheError::InvalidArguments(
                "key prefix must not be empty".to_string(),
            ));
        }
        if self.refresh_duration.is_zero() {
            return Err(LazyCacheError::InvalidArguments(format!(
                "{}: refresh duration must be greater than zero",
                self.key_prefix
            )));
        }
        if !self.expiration.is_zero() && self.expiration < self.refresh_duration {
            return Err(LazyCacheError::InvalidArguments(format!(
                "{}: expiration {:?} is shorter than refresh duration {:?}",
                self.key_prefix, self.expiration, self.refresh_duration
            )));
        }
        Ok(())
    }

    pub fn data_key(&self, hash: &str) -> String {
        format!("{}:{}:data:{}", KEY_ROOT, self.key_prefix, hash)
    }

    pub fn lock_key(&self, hash: &str) -> String {
        format!("{}:{}:locker:{}", KEY_ROOT, self.key_prefix, hash)
    }

    /// Store TTL, `None` when entries never expire.
    pub fn ttl(&self) -> Option<Duration> {
        if self.expiration.is_zero() {
            None
        } else {
            Some(self.expiration)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(expiration: u64, refresh: u64) -> LazyRefreshCacheOptions {
        LazyRefreshCacheOptions::new(
            "assessment",
            Duration::from_secs(expiration),
            Duration::from_secs(refresh),
        )
    }

    #[test]
    fn test_validate_accepts_valid_options() {
        assert!(options(60, 10).validate().is_ok());
        assert!(options(10, 10).validate().is_ok());
        assert!(options(0, 10).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_refresh() {
        assert!(matches!(
            options(60, 0).validate(),
            Err(LazyCacheError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_validate_rejects_expiration_below_refresh() {
        assert!(matches!(
            options(5, 10).validate(),
            Err(LazyCacheError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_prefix() {
        let mut opts = options(60, 10);
        opts.key_prefix = " ".to_string();
        assert!(opts.validate().is_err());
    }

    #[test]
    fn test_keys() {
        let opts = options(60, 10);
        assert_eq!(opts.data_key("abc"), "lazy_refresh_cache:assessment:data:abc");
        assert_eq!(opts.lock_key("abc"), "lazy_refresh_cache:assessment:locker:abc");
    }

    #[test]
    fn test_zero_expiration_has_no_ttl() {
        assert_eq!(options(0, 10).ttl(), None);
        assert_eq!(options(60, 10).ttl(), Some(Duration::from_secs(60)));
    }
}
