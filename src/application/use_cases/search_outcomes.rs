use std::str::FromStr;
use std::sync::Arc;

use crate::application::cache::{
    LazyCacheError, LazyRefreshCache, LazyRefreshCacheFactory, LazyRefreshCacheOptions, QueryError,
};
use crate::application::conditions::{OutcomeCondition, OutcomeOrderBy, Pager};
use crate::application::dto::{split_list, OutcomePage, SearchOutcomesRequest, SearchOutcomesResponse};
use crate::application::errors::OutcomeUseCaseError;
use crate::application::ports::OutcomeRepository;
use crate::domain::errors::DomainError;
use crate::domain::value_objects::PublishStatus;

const DEFAULT_PAGE_SIZE: u32 = 20;

/// Use case: Paged outcome search with total count, through the cache
pub struct SearchOutcomesUseCase {
    cache: LazyRefreshCache<OutcomeCondition, OutcomePage>,
}

impl SearchOutcomesUseCase {
    pub fn new(
        outcome_repo: Arc<dyn OutcomeRepository>,
        caches: &LazyRefreshCacheFactory,
        options: LazyRefreshCacheOptions,
    ) -> Result<Self, LazyCacheError> {
        let cache = caches.create(options, move |condition: OutcomeCondition| {
            let repo = Arc::clone(&outcome_repo);
            async move {
                let (outcomes, total) =
                    tokio::try_join!(repo.search(&condition), repo.count(&condition))?;
                Ok::<_, QueryError>(OutcomePage { total, outcomes })
            }
        })?;
        Ok(Self { cache })
    }

    pub async fn execute(
        &self,
        request: &SearchOutcomesRequest,
    ) -> Result<SearchOutcomesResponse, OutcomeUseCaseError> {
        let condition = to_condition(request)?;
        let page = self.cache.get(&condition).await?;

        Ok(SearchOutcomesResponse {
            total: page.total,
            page: condition.pager.page,
            page_size: condition.pager.page_size,
            outcomes: page.outcomes.into_iter().map(Into::into).collect(),
        })
    }
}

fn to_condition(request: &SearchOutcomesRequest) -> Result<OutcomeCondition, OutcomeUseCaseError> {
    if request.org_id.trim().is_empty() {
        return Err(DomainError::InvalidId {
            kind: "organization",
            value: request.org_id.clone(),
        }
        .into());
    }

    let publish_statuses = split_list(request.publish_status.as_deref())
        .map(|list| {
            list.iter()
                .map(|s| PublishStatus::from_str(s))
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?;

    let order_by = match request.order_by.as_deref() {
        Some(raw) => OutcomeOrderBy::from_str(raw).map_err(OutcomeUseCaseError::InvalidRequest)?,
        None => OutcomeOrderBy::default(),
    };

    let pager = Pager::new(
        request.page.unwrap_or(1).max(1),
        request.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1),
    )
    .capped();

    Ok(OutcomeCondition {
        org_id: Some(request.org_id.clone()),
        author_id: request.author_id.clone(),
        publish_statuses,
        keywords: request
            .keywords
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string),
        assessed: request.assessed,
        pager,
        order_by,
        ..Default::default()
    })
}
