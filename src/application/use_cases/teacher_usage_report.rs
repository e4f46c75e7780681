use std::sync::Arc;

use crate::application::cache::{
    LazyCacheError, LazyRefreshCache, LazyRefreshCacheFactory, LazyRefreshCacheOptions, QueryError,
};
use crate::application::conditions::TeacherUsageCondition;
use crate::application::dto::{split_list, TeacherUsageReport, TeacherUsageRequest};
use crate::application::errors::ReportUseCaseError;
use crate::application::ports::ReportRepository;
use crate::domain::entities::TeacherUsage;

/// Use case: Assessment counts per teacher, through the cache
pub struct TeacherUsageReportUseCase {
    cache: LazyRefreshCache<TeacherUsageCondition, Vec<TeacherUsage>>,
}

impl TeacherUsageReportUseCase {
    pub fn new(
        report_repo: Arc<dyn ReportRepository>,
        caches: &LazyRefreshCacheFactory,
        options: LazyRefreshCacheOptions,
    ) -> Result<Self, LazyCacheError> {
        let cache = caches.create(options, move |condition: TeacherUsageCondition| {
            let repo = Arc::clone(&report_repo);
            async move { repo.teacher_usage(&condition).await.map_err(QueryError::from) }
        })?;
        Ok(Self { cache })
    }

    pub async fn execute(
        &self,
        request: &TeacherUsageRequest,
    ) -> Result<TeacherUsageReport, ReportUseCaseError> {
        let mut teacher_ids = split_list(request.teacher_ids.as_deref());
        if let Some(ids) = teacher_ids.as_mut() {
            ids.sort();
            ids.dedup();
        }

        let condition = TeacherUsageCondition {
            org_id: request.org_id.trim().to_string(),
            teacher_ids,
            start: request.start,
            end: request.end,
        };
        condition.validate()?;

        let rows = self.cache.get(&condition).await?;
        Ok(TeacherUsageReport {
            org_id: condition.org_id,
            rows: rows.into_iter().map(Into::into).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::cache::RefreshPool;
    use crate::application::ports::MockReportRepository;
    use crate::domain::errors::DomainError;
    use crate::infrastructure::cache::{MemoryCacheStore, MemoryLocker};
    use std::time::Duration;

    fn use_case(repo: MockReportRepository) -> TeacherUsageReportUseCase {
        let caches = LazyRefreshCacheFactory::new(
            Arc::new(MemoryCacheStore::new()),
            Arc::new(MemoryLocker::default()),
            RefreshPool::default(),
            "test",
        );
        let options = LazyRefreshCacheOptions::new(
            "teacher_usage",
            Duration::from_secs(600),
            Duration::from_secs(60),
        );
        TeacherUsageReportUseCase::new(Arc::new(repo), &caches, options).unwrap()
    }

    #[tokio::test]
    async fn test_report_normalizes_teacher_ids() {
        // Arrange
        let mut repo = MockReportRepository::new();
        repo.expect_teacher_usage()
            .withf(|c| c.teacher_ids == Some(vec!["t1".to_string(), "t2".to_string()]))
            .times(1)
            .returning(|_| {
                Ok(vec![TeacherUsage {
                    teacher_id: "t1".to_string(),
                    assessment_count: 4,
                    completed_count: 3,
                }])
            });
        let use_case = use_case(repo);

        // Act: both spellings hash to the same cache entry
        let first = use_case
            .execute(&TeacherUsageRequest {
                org_id: "org".to_string(),
                teacher_ids: Some("t2,t1".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let second = use_case
            .execute(&TeacherUsageRequest {
                org_id: "org".to_string(),
                teacher_ids: Some("t1, t2, t1".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        // Assert
        assert_eq!(first.rows.len(), 1);
        assert_eq!(first.rows[0].completion_rate, 75.0);
        assert_eq!(second.rows[0].teacher_id, "t1");
    }

    #[tokio::test]
    async fn test_report_rejects_inverted_range() {
        let mut repo = MockReportRepository::new();
        repo.expect_teacher_usage().never();
        let use_case = use_case(repo);

        let result = use_case
            .execute(&TeacherUsageRequest {
                org_id: "org".to_string(),
                start: Some(10),
                end: Some(1),
                ..Default::default()
            })
            .await;
        assert!(matches!(
            result,
            Err(ReportUseCaseError::Domain(DomainError::InvalidTimeRange { .. }))
        ));
    }
}
