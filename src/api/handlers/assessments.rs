use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::errors::ApiError;
use crate::application::dto::{
    AssessmentByIdRequest, AssessmentDto, AttachOutcomesRequest, AttachOutcomesResponse,
};
use crate::application::use_cases::{AttachOutcomesUseCase, GetAssessmentUseCase};

#[derive(Debug, Deserialize)]
pub struct OrgQuery {
    pub org_id: String,
}

/// GET /v1/assessments/{id}?org_id=
pub async fn get_assessment_handler(
    State(use_case): State<Arc<GetAssessmentUseCase>>,
    Path(id): Path<String>,
    Query(query): Query<OrgQuery>,
) -> Result<Json<AssessmentDto>, ApiError> {
    let request = AssessmentByIdRequest {
        org_id: query.org_id,
        id,
    };
    let assessment = use_case.execute(&request).await?;
    Ok(Json(assessment))
}

/// POST /v1/assessments/{id}/outcomes
pub async fn attach_outcomes_handler(
    State(use_case): State<Arc<AttachOutcomesUseCase>>,
    Path(id): Path<String>,
    Json(request): Json<AttachOutcomesRequest>,
) -> Result<(StatusCode, Json<AttachOutcomesResponse>), ApiError> {
    let response = use_case.execute(&id, &request).await?;
    let status = if response.attached > 0 {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(response)))
}
