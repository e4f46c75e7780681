use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::errors::ApiError;
use crate::application::dto::{SearchOutcomesRequest, SearchOutcomesResponse};
use crate::application::use_cases::SearchOutcomesUseCase;

/// GET /v1/outcomes
pub async fn search_outcomes_handler(
    State(use_case): State<Arc<SearchOutcomesUseCase>>,
    Query(request): Query<SearchOutcomesRequest>,
) -> Result<Json<SearchOutcomesResponse>, ApiError> {
    let response = use_case.execute(&request).await?;
    Ok(Json(response))
}
