//! Readiness probes for the database and the cache backend.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::{json, Value};
use sqlx::MySqlPool;

use crate::application::cache::RefreshPool;
use crate::application::ports::CacheStore;

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);
const CACHE_PROBE_KEY: &str = "lesson_store:readiness_probe";

/// Dependencies checked by `GET /health/ready`
pub struct HealthState {
    pub pool: MySqlPool,
    pub cache_store: Arc<dyn CacheStore>,
    pub refresh_pool: RefreshPool,
}

/// Outcome of one probe
#[derive(Debug)]
pub struct ProbeResult {
    pub healthy: bool,
    pub details: Value,
}

/// Sanitize database error messages to prevent information leakage
pub fn sanitize_db_error(error: &sqlx::Error) -> String {
    match error {
        sqlx::Error::Configuration(_) => "Database configuration error".to_string(),
        sqlx::Error::Database(_) => "Database operation error".to_string(),
        sqlx::Error::Io(_) => "Database connection error".to_string(),
        sqlx::Error::Tls(_) => "Database TLS error".to_string(),
        sqlx::Error::PoolTimedOut => "Database pool timeout".to_string(),
        sqlx::Error::PoolClosed => "Database pool closed".to_string(),
        _ => "Database error".to_string(),
    }
}

pub async fn check_database(pool: &MySqlPool) -> ProbeResult {
    let start = Instant::now();
    let check = tokio::time::timeout(
        PROBE_TIMEOUT,
        sqlx::query_scalar::<_, i64>("select 1").fetch_one(pool),
    )
    .await;

    match check {
        Ok(Ok(_)) => ProbeResult {
            healthy: true,
            details: json!({
                "status": "connected",
                "response_time_ms": start.elapsed().as_millis() as u64,
            }),
        },
        Ok(Err(e)) => ProbeResult {
            healthy: false,
            details: json!({ "status": "disconnected", "error": sanitize_db_error(&e) }),
        },
        Err(_) => ProbeResult {
            healthy: false,
            details: json!({ "status": "timeout" }),
        },
    }
}

/// A missing probe key still proves the backend answered.
pub async fn check_cache(store: &dyn CacheStore) -> ProbeResult {
    let start = Instant::now();
    match tokio::time::timeout(PROBE_TIMEOUT, store.get(CACHE_PROBE_KEY)).await {
        Ok(Ok(_)) => ProbeResult {
            healthy: true,
            details: json!({
                "status": "connected",
                "response_time_ms": start.elapsed().as_millis() as u64,
            }),
        },
        Ok(Err(e)) if e.is_not_found() => ProbeResult {
            healthy: true,
            details: json!({
                "status": "connected",
                "response_time_ms": start.elapsed().as_millis() as u64,
            }),
        },
        Ok(Err(_)) => ProbeResult {
            healthy: false,
            details: json!({ "status": "unreachable" }),
        },
        Err(_) => ProbeResult {
            healthy: false,
            details: json!({ "status": "timeout" }),
        },
    }
}

pub fn refresh_pool_details(pool: &RefreshPool) -> Value {
    let stats = pool.stats();
    json!({
        "shut_down": pool.is_shut_down(),
        "in_flight": stats.in_flight,
        "completed": stats.completed,
        "dropped": stats.dropped,
        "timed_out": stats.timed_out,
    })
}
