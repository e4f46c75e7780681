//! Lazy-refresh read-through cache.
//!
//! Results of a raw query are stored in a shared [`CacheStore`] keyed by a
//! hash of the request. A miss recomputes synchronously, a stale hit returns
//! the cached value and refreshes in the background through a bounded
//! [`RefreshPool`]. Recomputation of one request hash is serialized across
//! processes by a [`DistributedLocker`].
//!
//! [`CacheStore`]: crate::application::ports::CacheStore
//! [`DistributedLocker`]: crate::application::ports::DistributedLocker

mod errors;
mod factory;
mod lazy_refresh;
mod options;
mod raw_query;
mod refresh_pool;
mod request_hash;

pub use errors::LazyCacheError;
pub use factory::LazyRefreshCacheFactory;
pub use lazy_refresh::{LazyRefreshCache, LazyRefreshCacheBuilder};
pub use options::LazyRefreshCacheOptions;
pub use raw_query::{QueryError, RawQuery};
pub use refresh_pool::{RefreshPool, RefreshPoolConfig, RefreshPoolStats};
pub use request_hash::request_hash;
