mod assessment_repository;
mod cache_store;
mod distributed_locker;
mod errors;
mod outcome_repository;
mod report_repository;

pub use assessment_repository::AssessmentRepository;
pub use cache_store::{CacheStore, CacheStoreError};
pub use distributed_locker::{DistributedLocker, LockError, LockToken};
pub use errors::RepositoryError;
pub use outcome_repository::OutcomeRepository;
pub use report_repository::ReportRepository;

#[cfg(test)]
pub use assessment_repository::MockAssessmentRepository;
#[cfg(test)]
pub use outcome_repository::MockOutcomeRepository;
#[cfg(test)]
pub use report_repository::MockReportRepository;
