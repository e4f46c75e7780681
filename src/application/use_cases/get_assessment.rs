use std::sync::Arc;

use tracing::debug;

use crate::application::cache::{
    LazyCacheError, LazyRefreshCache, LazyRefreshCacheFactory, LazyRefreshCacheOptions, QueryError,
};
use crate::application::conditions::AssessmentOutcomeCondition;
use crate::application::dto::{AssessmentByIdRequest, AssessmentDetail, AssessmentDto};
use crate::application::errors::AssessmentUseCaseError;
use crate::application::ports::{AssessmentRepository, RepositoryError};
use crate::domain::errors::DomainError;

/// Use case: Get an assessment with its outcome ids, through the cache
pub struct GetAssessmentUseCase {
    cache: LazyRefreshCache<AssessmentByIdRequest, Option<AssessmentDetail>>,
}

impl GetAssessmentUseCase {
    pub fn new(
        assessment_repo: Arc<dyn AssessmentRepository>,
        caches: &LazyRefreshCacheFactory,
        options: LazyRefreshCacheOptions,
    ) -> Result<Self, LazyCacheError> {
        let cache = caches.create(options, move |request: AssessmentByIdRequest| {
            let repo = Arc::clone(&assessment_repo);
            async move {
                load_detail(repo.as_ref(), &request)
                    .await
                    .map_err(QueryError::from)
            }
        })?;
        Ok(Self { cache })
    }

    pub async fn execute(
        &self,
        request: &AssessmentByIdRequest,
    ) -> Result<AssessmentDto, AssessmentUseCaseError> {
        if request.org_id.trim().is_empty() {
            return Err(DomainError::InvalidId {
                kind: "organization",
                value: request.org_id.clone(),
            }
            .into());
        }
        if request.id.trim().is_empty() {
            return Err(DomainError::InvalidId {
                kind: "assessment",
                value: request.id.clone(),
            }
            .into());
        }

        match self.cache.get(request).await? {
            Some(detail) => Ok(detail.into()),
            None => Err(AssessmentUseCaseError::NotFound(request.id.clone())),
        }
    }
}

/// Raw query behind the cache. Absent assessments are cached as `None`.
async fn load_detail(
    repo: &dyn AssessmentRepository,
    request: &AssessmentByIdRequest,
) -> Result<Option<AssessmentDetail>, RepositoryError> {
    let Some(assessment) = repo.find_by_id(&request.org_id, &request.id).await? else {
        debug!(org_id = %request.org_id, id = %request.id, "Assessment not found");
        return Ok(None);
    };

    let links = repo
        .find_outcome_links(&AssessmentOutcomeCondition {
            assessment_ids: Some(vec![assessment.id.clone()]),
            ..Default::default()
        })
        .await?;

    Ok(Some(AssessmentDetail {
        assessment,
        outcome_ids: links.into_iter().map(|l| l.outcome_id).collect(),
    }))
}
