use async_trait::async_trait;

use crate::application::conditions::TeacherUsageCondition;
use crate::application::ports::RepositoryError;
use crate::domain::entities::TeacherUsage;
#[cfg(test)]
use mockall::automock;

/// Port for aggregate reports
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn teacher_usage(
        &self,
        condition: &TeacherUsageCondition,
    ) -> Result<Vec<TeacherUsage>, RepositoryError>;
}
