use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::json;
use std::sync::Arc;

use super::health_checks::{check_cache, check_database, refresh_pool_details, HealthState};

/// GET /health
/// Liveness probe, touches no backend
pub async fn health_handler() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "lesson_store",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}

/// GET /health/ready
/// Readiness probe over the database and the cache backend
pub async fn readiness_handler(
    State(state): State<Arc<HealthState>>,
) -> (StatusCode, Json<serde_json::Value>) {
    let (database, cache) = tokio::join!(
        check_database(&state.pool),
        check_cache(state.cache_store.as_ref())
    );
    let ready = database.healthy && cache.healthy && !state.refresh_pool.is_shut_down();

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if ready { "ready" } else { "not_ready" },
            "service": "lesson_store",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "database": database.details,
            "cache": cache.details,
            "refresh_pool": refresh_pool_details(&state.refresh_pool),
        })),
    )
}
