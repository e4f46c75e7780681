use async_trait::async_trait;
use sqlx::MySqlPool;

use super::executor::MySqlExecutor;
use crate::application::conditions::{AssessmentCondition, AssessmentOutcomeCondition, Pager};
use crate::application::ports::{AssessmentRepository, RepositoryError};
use crate::domain::entities::{Assessment, AssessmentOutcome};
use crate::domain::value_objects::AssessmentStatus;
use crate::sql::SqlValue;

const ASSESSMENTS: &str = "assessments";
const ASSESSMENT_COLUMNS: &str =
    "id, org_id, schedule_id, title, status, complete_at, create_at, update_at, delete_at";

const ASSESSMENTS_OUTCOMES: &str = "assessments_outcomes";
const LINK_COLUMNS: [&str; 7] = [
    "assessment_id",
    "outcome_id",
    "skip",
    "none_achieved",
    "checked",
    "create_at",
    "delete_at",
];

pub struct MySqlAssessmentRepository {
    executor: MySqlExecutor,
}

impl MySqlAssessmentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            executor: MySqlExecutor::new(pool),
        }
    }
}

#[async_trait]
impl AssessmentRepository for MySqlAssessmentRepository {
    async fn find_by_id(
        &self,
        org_id: &str,
        id: &str,
    ) -> Result<Option<Assessment>, RepositoryError> {
        let condition = AssessmentCondition {
            org_id: Some(org_id.to_string()),
            ids: Some(vec![id.to_string()]),
            pager: Pager::new(1, 1),
            ..Default::default()
        };

        let rows: Vec<AssessmentRow> = self
            .executor
            .page(ASSESSMENTS, ASSESSMENT_COLUMNS, &condition)
            .await?;

        match rows.into_iter().next() {
            Some(r) => Ok(Some(r.into_domain()?)),
            None => Ok(None),
        }
    }

    async fn find_outcome_links(
        &self,
        condition: &AssessmentOutcomeCondition,
    ) -> Result<Vec<AssessmentOutcome>, RepositoryError> {
        let rows: Vec<AssessmentOutcomeRow> = self
            .executor
            .page(ASSESSMENTS_OUTCOMES, &LINK_COLUMNS.join(", "), condition)
            .await?;

        Ok(rows.into_iter().map(AssessmentOutcomeRow::into_domain).collect())
    }

    async fn insert_outcome_links(
        &self,
        links: &[AssessmentOutcome],
    ) -> Result<u64, RepositoryError> {
        if links.is_empty() {
            return Ok(0);
        }

        let matrix: Vec<Vec<SqlValue>> = links
            .iter()
            .map(|link| {
                vec![
                    link.assessment_id.as_str().into(),
                    link.outcome_id.as_str().into(),
                    link.skip.into(),
                    link.none_achieved.into(),
                    link.checked.into(),
                    link.create_at.into(),
                    link.delete_at.into(),
                ]
            })
            .collect();

        self.executor
            .insert_batch(ASSESSMENTS_OUTCOMES, &LINK_COLUMNS, matrix)
            .await
    }
}

#[derive(sqlx::FromRow)]
struct AssessmentRow {
    id: String,
    org_id: String,
    schedule_id: String,
    title: String,
    status: String,
    complete_at: i64,
    create_at: i64,
    update_at: i64,
    delete_at: i64,
}

impl AssessmentRow {
    fn into_domain(self) -> Result<Assessment, RepositoryError> {
        let status = self.status.parse::<AssessmentStatus>()?;

        Ok(Assessment {
            id: self.id,
            org_id: self.org_id,
            schedule_id: self.schedule_id,
            title: self.title,
            status,
            complete_at: self.complete_at,
            create_at: self.create_at,
            update_at: self.update_at,
            delete_at: self.delete_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AssessmentOutcomeRow {
    assessment_id: String,
    outcome_id: String,
    skip: bool,
    none_achieved: bool,
    checked: bool,
    create_at: i64,
    delete_at: i64,
}

impl AssessmentOutcomeRow {
    fn into_domain(self) -> AssessmentOutcome {
        AssessmentOutcome {
            assessment_id: self.assessment_id,
            outcome_id: self.outcome_id,
            skip: self.skip,
            none_achieved: self.none_achieved,
            checked: self.checked,
            create_at: self.create_at,
            delete_at: self.delete_at,
        }
    }
}
