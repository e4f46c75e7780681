use async_trait::async_trait;
use sqlx::MySqlPool;

use super::executor::MySqlExecutor;
use crate::application::conditions::OutcomeCondition;
use crate::application::ports::{OutcomeRepository, RepositoryError};
use crate::domain::entities::Outcome;
use crate::domain::value_objects::PublishStatus;

const LEARNING_OUTCOMES: &str = "learning_outcomes";
const OUTCOME_COLUMNS: &str = "id, organization_id, name, shortcode, keywords, author_id, \
     publish_status, assessed, create_at, update_at, delete_at";

pub struct MySqlOutcomeRepository {
    executor: MySqlExecutor,
}

impl MySqlOutcomeRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            executor: MySqlExecutor::new(pool),
        }
    }
}

#[async_trait]
impl OutcomeRepository for MySqlOutcomeRepository {
    async fn search(&self, condition: &OutcomeCondition) -> Result<Vec<Outcome>, RepositoryError> {
        let rows: Vec<OutcomeRow> = self
            .executor
            .page(LEARNING_OUTCOMES, OUTCOME_COLUMNS, condition)
            .await?;

        rows.into_iter().map(|r| r.into_domain()).collect()
    }

    async fn count(&self, condition: &OutcomeCondition) -> Result<i64, RepositoryError> {
        self.executor.count(LEARNING_OUTCOMES, condition).await
    }
}

#[derive(sqlx::FromRow)]
struct OutcomeRow {
    id: String,
    organization_id: String,
    name: String,
    shortcode: String,
    keywords: String,
    author_id: String,
    publish_status: String,
    assessed: bool,
    create_at: i64,
    update_at: i64,
    delete_at: i64,
}

impl OutcomeRow {
    fn into_domain(self) -> Result<Outcome, RepositoryError> {
        let publish_status = self.publish_status.parse::<PublishStatus>()?;

        Ok(Outcome {
            id: self.id,
            org_id: self.organization_id,
            name: self.name,
            shortcode: self.shortcode,
            keywords: self.keywords,
            author_id: self.author_id,
            publish_status,
            assessed: self.assessed,
            create_at: self.create_at,
            update_at: self.update_at,
            delete_at: self.delete_at,
        })
    }
}
