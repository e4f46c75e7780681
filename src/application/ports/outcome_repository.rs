use async_trait::async_trait;

use crate::application::conditions::OutcomeCondition;
use crate::application::ports::RepositoryError;
use crate::domain::entities::Outcome;
#[cfg(test)]
use mockall::automock;

/// Port for learning outcome lookups
#[cfg_attr(test, automock)]
#[async_trait]
pub trait OutcomeRepository: Send + Sync {
    /// One page of outcomes matching the condition
    async fn search(&self, condition: &OutcomeCondition) -> Result<Vec<Outcome>, RepositoryError>;

    /// Total matches, ignoring paging
    async fn count(&self, condition: &OutcomeCondition) -> Result<i64, RepositoryError>;
}
