use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api::handlers::{
    attach_outcomes_handler, get_assessment_handler, health_handler, readiness_handler,
    search_outcomes_handler, teacher_usage_handler, HealthState,
};
use crate::api::middleware::cors::create_cors_layer_for_environment;
use crate::application::use_cases::{
    AttachOutcomesUseCase, GetAssessmentUseCase, SearchOutcomesUseCase, TeacherUsageReportUseCase,
};

/// Application state container
pub struct AppState {
    pub health: Arc<HealthState>,
    pub get_assessment_use_case: Arc<GetAssessmentUseCase>,
    pub attach_outcomes_use_case: Arc<AttachOutcomesUseCase>,
    pub search_outcomes_use_case: Arc<SearchOutcomesUseCase>,
    pub teacher_usage_use_case: Arc<TeacherUsageReportUseCase>,
}

/// Create router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/health/ready",
            get(readiness_handler).with_state(state.health),
        )
        .route(
            "/v1/assessments/{id}",
            get(get_assessment_handler).with_state(state.get_assessment_use_case),
        )
        .route(
            "/v1/assessments/{id}/outcomes",
            post(attach_outcomes_handler).with_state(state.attach_outcomes_use_case),
        )
        .route(
            "/v1/outcomes",
            get(search_outcomes_handler).with_state(state.search_outcomes_use_case),
        )
        .route(
            "/v1/reports/teacher-usage",
            get(teacher_usage_handler).with_state(state.teacher_usage_use_case),
        )
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer_for_environment())
}
