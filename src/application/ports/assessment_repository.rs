use async_trait::async_trait;

use crate::application::conditions::AssessmentOutcomeCondition;
use crate::application::ports::RepositoryError;
use crate::domain::entities::{Assessment, AssessmentOutcome};
#[cfg(test)]
use mockall::automock;

/// Port for assessment persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AssessmentRepository: Send + Sync {
    /// Find a live assessment by id within an organization
    async fn find_by_id(
        &self,
        org_id: &str,
        id: &str,
    ) -> Result<Option<Assessment>, RepositoryError>;

    /// Find outcome links matching the condition
    async fn find_outcome_links(
        &self,
        condition: &AssessmentOutcomeCondition,
    ) -> Result<Vec<AssessmentOutcome>, RepositoryError>;

    /// Insert outcome links in one statement, returning rows affected
    async fn insert_outcome_links(
        &self,
        links: &[AssessmentOutcome],
    ) -> Result<u64, RepositoryError>;
}
