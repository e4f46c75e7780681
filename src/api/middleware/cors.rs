use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Origins from a comma-separated list, skipping entries that are not valid
/// header values.
pub fn parse_origins(raw: &str) -> Vec<HeaderValue> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect()
}

/// Read-mostly API: GET for lookups and reports, POST for outcome links.
pub fn create_cors_layer(allowed_origins: &str) -> CorsLayer {
    let origins = parse_origins(allowed_origins);
    let origins = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS, Method::HEAD])
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("x-request-id"),
        ])
        .max_age(std::time::Duration::from_secs(3600))
}

/// `ALLOWED_ORIGINS` in production, any origin otherwise.
pub fn create_cors_layer_for_environment() -> CorsLayer {
    let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

    if environment.eq_ignore_ascii_case("production") {
        let allowed = std::env::var("ALLOWED_ORIGINS").unwrap_or_default();
        create_cors_layer(&allowed)
    } else {
        CorsLayer::permissive()
    }
}
