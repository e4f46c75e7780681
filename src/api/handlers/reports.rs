use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::errors::ApiError;
use crate::application::dto::{TeacherUsageReport, TeacherUsageRequest};
use crate::application::use_cases::TeacherUsageReportUseCase;

/// GET /v1/reports/teacher-usage
pub async fn teacher_usage_handler(
    State(use_case): State<Arc<TeacherUsageReportUseCase>>,
    Query(request): Query<TeacherUsageRequest>,
) -> Result<Json<TeacherUsageReport>, ApiError> {
    let report = use_case.execute(&request).await?;
    Ok(Json(report))
}
