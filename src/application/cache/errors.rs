use thiserror::Error;

use super::raw_query::QueryError;
use crate::application::ports::{CacheStoreError, LockError};

#[derive(Debug, Error)]
pub enum LazyCacheError {
    #[error("Invalid cache arguments: {0}")]
    InvalidArguments(String),

    #[error("Failed to hash request: {0}")]
    Hash(#[source] serde_json::Error),

    #[error("Failed to encode cache entry: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to decode cache entry: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Query failed: {0}")]
    Query(#[source] QueryError),

    #[error(transparent)]
    Store(#[from] CacheStoreError),

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error("Cache entry {key} still missing after refresh")]
    Missing { key: String },
}
