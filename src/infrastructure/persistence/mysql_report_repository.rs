use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::debug;

use super::executor::MySqlExecutor;
use crate::application::conditions::{QueryCondition, TeacherUsageCondition};
use crate::application::ports::{ReportRepository, RepositoryError};
use crate::domain::entities::TeacherUsage;
use crate::sql::{Separator, SqlBuilder, SqlTemplate};

const TEACHER_USAGE_SELECT: &str = "select au.user_id as teacher_id, \
     count(distinct a.id) as assessment_count, \
     cast(coalesce(sum(case when a.status = 'complete' then 1 else 0 end), 0) as signed) as completed_count \
     from assessments a inner join assessments_users au on au.assessment_id = a.id";

pub struct MySqlReportRepository {
    executor: MySqlExecutor,
}

impl MySqlReportRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            executor: MySqlExecutor::new(pool),
        }
    }
}

/// Full teacher-usage statement: select, where, group by, order by.
pub(crate) fn teacher_usage_statement(condition: &TeacherUsageCondition) -> SqlTemplate {
    let conditions = condition.conditions();

    let mut builder = SqlBuilder::new(Separator::Space);
    builder.appendf(TEACHER_USAGE_SELECT, Vec::new());
    if !conditions.is_empty() {
        let (where_list, values) = conditions.and();
        builder.appendf(format!("where {}", where_list), values);
    }
    builder.appendf("group by au.user_id", Vec::new());
    if let Some(order_by) = condition.order_by() {
        builder.appendf(format!("order by {}", order_by), Vec::new());
    }
    builder.build()
}

#[async_trait]
impl ReportRepository for MySqlReportRepository {
    async fn teacher_usage(
        &self,
        condition: &TeacherUsageCondition,
    ) -> Result<Vec<TeacherUsage>, RepositoryError> {
        let statement = teacher_usage_statement(condition);
        let rows: Vec<TeacherUsageRow> = self.executor.fetch_all(&statement).await?;
        debug!(org_id = %condition.org_id, rows = rows.len(), "Teacher usage rows loaded");

        Ok(rows.into_iter().map(TeacherUsageRow::into_domain).collect())
    }
}

#[derive(sqlx::FromRow)]
struct TeacherUsageRow {
    teacher_id: String,
    assessment_count: i64,
    completed_count: i64,
}

impl TeacherUsageRow {
    fn into_domain(self) -> TeacherUsage {
        TeacherUsage {
            teacher_id: self.teacher_id,
            assessment_count: self.assessment_count,
            completed_count: self.completed_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;

    #[test]
    fn test_teacher_usage_statement() {
        let condition = TeacherUsageCondition {
            org_id: "org".to_string(),
            teacher_ids: None,
            start: Some(100),
            end: Some(200),
        };

        let statement = teacher_usage_statement(&condition);
        assert_eq!(statement.len(), 1);
        assert!(statement.validate().is_ok());

        let (sql, values) = statement.concat();
        assert!(sql.starts_with("select au.user_id as teacher_id"));
        assert!(sql.ends_with(
            "where (au.user_type = ? and a.org_id = ? and a.create_at >= ? and a.create_at < ? and a.delete_at = 0) \
             group by au.user_id order by teacher_id asc"
        ));
        assert_eq!(values, params!["teacher", "org", 100i64, 200i64]);
    }
}
