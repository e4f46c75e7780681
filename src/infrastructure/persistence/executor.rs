use sqlx::mysql::{MySqlArguments, MySqlRow};
use sqlx::{Arguments, FromRow, MySqlPool};
use tracing::debug;

use crate::application::conditions::QueryCondition;
use crate::application::ports::RepositoryError;
use crate::sql::{sql_batch_insert, SqlTemplate, SqlTemplateError, SqlValue};

/// Renders `select <columns> from <table> [where ..] [order by ..] [limit ..]`.
///
/// Fragments are joined with `and`. The template is validated first so a
/// placeholder/value mismatch never reaches the driver.
pub fn build_select(
    table: &str,
    columns: &str,
    condition: &dyn QueryCondition,
) -> Result<(String, Vec<SqlValue>), SqlTemplateError> {
    let (mut sql, values) = select_with_where(table, columns, condition)?;

    if let Some(order_by) = condition.order_by().filter(|o| !o.trim().is_empty()) {
        sql.push_str(" order by ");
        sql.push_str(&order_by);
    }

    let pager = condition.pager().capped();
    if pager.is_enabled() {
        sql.push_str(&format!(" limit {} offset {}", pager.limit(), pager.offset()));
    }

    Ok((sql, values))
}

/// Renders `select count(*) from <table> [where ..]`, ignoring order and paging.
pub fn build_count(
    table: &str,
    condition: &dyn QueryCondition,
) -> Result<(String, Vec<SqlValue>), SqlTemplateError> {
    select_with_where(table, "count(*)", condition)
}

fn select_with_where(
    table: &str,
    columns: &str,
    condition: &dyn QueryCondition,
) -> Result<(String, Vec<SqlValue>), SqlTemplateError> {
    let template = condition.conditions();
    template.validate()?;

    let (formats, values) = template.dbo_conditions();
    let mut sql = format!("select {} from {}", columns, table);
    if !formats.is_empty() {
        sql.push_str(" where ");
        sql.push_str(&formats.join(" and "));
    }
    Ok((sql, values))
}

/// Binds values positionally, in order.
pub fn to_arguments(values: &[SqlValue]) -> Result<MySqlArguments, RepositoryError> {
    let mut args = MySqlArguments::default();
    for value in values {
        let bound = match value {
            SqlValue::Null => args.add(Option::<String>::None),
            SqlValue::Bool(v) => args.add(*v),
            SqlValue::Int(v) => args.add(*v),
            SqlValue::UInt(v) => args.add(*v),
            SqlValue::Float(v) => args.add(*v),
            SqlValue::Text(v) => args.add(v.clone()),
            SqlValue::Bytes(v) => args.add(v.clone()),
            SqlValue::Timestamp(v) => args.add(*v),
        };
        bound.map_err(|e| RepositoryError::Bind(e.to_string()))?;
    }
    Ok(args)
}

/// Generic paging/query executor over a MySQL pool.
#[derive(Clone)]
pub struct MySqlExecutor {
    pool: MySqlPool,
}

impl MySqlExecutor {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Rows of `table` matching the condition, ordered and paged.
    pub async fn page<T>(
        &self,
        table: &str,
        columns: &str,
        condition: &dyn QueryCondition,
    ) -> Result<Vec<T>, RepositoryError>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
    {
        let (sql, values) = build_select(table, columns, condition)?;
        debug!(sql = %sql, params = values.len(), "Executing page query");

        let rows = sqlx::query_as_with::<_, T, _>(&sql, to_arguments(&values)?)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn count(
        &self,
        table: &str,
        condition: &dyn QueryCondition,
    ) -> Result<i64, RepositoryError> {
        let (sql, values) = build_count(table, condition)?;
        debug!(sql = %sql, params = values.len(), "Executing count query");

        let total = sqlx::query_scalar_with::<_, i64, _>(&sql, to_arguments(&values)?)
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    /// Runs a fully built statement, e.g. the output of `SqlBuilder::build`.
    pub async fn fetch_all<T>(&self, statement: &SqlTemplate) -> Result<Vec<T>, RepositoryError>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
    {
        statement.validate()?;
        let (sql, values) = statement.concat();
        debug!(sql = %sql, params = values.len(), "Executing statement");

        let rows = sqlx::query_as_with::<_, T, _>(&sql, to_arguments(&values)?)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn insert_batch<C>(
        &self,
        table: &str,
        columns: &[C],
        matrix: Vec<Vec<SqlValue>>,
    ) -> Result<u64, RepositoryError>
    where
        C: AsRef<str>,
    {
        let rows = matrix.len();
        let (sql, values) = sql_batch_insert(table, columns, matrix)?;
        debug!(table = %table, rows, "Executing batch insert");

        let result = sqlx::query_with(&sql, to_arguments(&values)?)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
