use super::errors::SqlTemplateError;
use super::template::in_placeholders;
use super::value::SqlValue;

/// Renders a multi-row insert.
///
/// Produces `insert into <table>(<columns>) values (?,..),(?,..)` and the
/// values flattened in row-major order. `table` and `columns` are written
/// into the SQL text verbatim and must come from trusted code, never from
/// request input.
pub fn sql_batch_insert<C>(
    table: &str,
    columns: &[C],
    matrix: Vec<Vec<SqlValue>>,
) -> Result<(String, Vec<SqlValue>), SqlTemplateError>
where
    C: AsRef<str>,
{
    if columns.is_empty() {
        return Err(SqlTemplateError::NoColumns {
            table: table.to_string(),
        });
    }
    if matrix.is_empty() {
        return Err(SqlTemplateError::EmptyBatch {
            table: table.to_string(),
        });
    }

    let width = columns.len();
    if let Some((row, values)) = matrix.iter().enumerate().find(|(_, r)| r.len() != width) {
        return Err(SqlTemplateError::RaggedRow {
            table: table.to_string(),
            row,
            expected: width,
            actual: values.len(),
        });
    }

    let column_list: Vec<&str> = columns.iter().map(AsRef::as_ref).collect();
    let row_placeholders = format!("({})", in_placeholders(width));
    let rows = vec![row_placeholders.as_str(); matrix.len()].join(",");

    let sql = format!(
        "insert into {}({}) values {}",
        table,
        column_list.join(","),
        rows
    );
    let values = matrix.into_iter().flatten().collect();

    Ok((sql, values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;

    #[test]
    fn test_batch_insert_shape() {
        let (sql, values) =
            sql_batch_insert("t", &["x", "y"], vec![params![1, 2], params![3, 4]]).unwrap();

        assert_eq!(sql, "insert into t(x,y) values (?,?),(?,?)");
        assert_eq!(values, params![1, 2, 3, 4]);
    }

    #[test]
    fn test_batch_insert_single_column() {
        let columns = vec!["id".to_string()];
        let (sql, values) = sql_batch_insert("ids", &columns, vec![params!["a"]]).unwrap();

        assert_eq!(sql, "insert into ids(id) values (?)");
        assert_eq!(values, params!["a"]);
    }

    #[test]
    fn test_batch_insert_rejects_empty_matrix() {
        let err = sql_batch_insert("t", &["x"], vec![]).unwrap_err();
        assert!(matches!(err, SqlTemplateError::EmptyBatch { .. }));
    }

    #[test]
    fn test_batch_insert_rejects_no_columns() {
        let columns: [&str; 0] = [];
        let err = sql_batch_insert("t", &columns, vec![params![1]]).unwrap_err();
        assert!(matches!(err, SqlTemplateError::NoColumns { .. }));
    }

    #[test]
    fn test_batch_insert_rejects_ragged_rows() {
        let err = sql_batch_insert("t", &["x", "y"], vec![params![1, 2], params![3]]).unwrap_err();
        assert_eq!(
            err,
            SqlTemplateError::RaggedRow {
                table: "t".to_string(),
                row: 1,
                expected: 2,
                actual: 1,
            }
        );
    }
}
