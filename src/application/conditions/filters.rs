//! Filter helpers. Each returns an empty template when its filter is absent.

use crate::sql::{SqlTemplate, SqlValue};

/// `column = ?`
pub fn eq<V>(column: &str, value: Option<V>) -> SqlTemplate
where
    V: Into<SqlValue>,
{
    match value {
        Some(v) => SqlTemplate::new(format!("{} = ?", column), vec![v.into()]),
        None => SqlTemplate::default(),
    }
}

/// `column in (?,...)`. `Some` of an empty list matches nothing.
pub fn in_list<I, V>(column: &str, values: Option<I>) -> SqlTemplate
where
    I: IntoIterator<Item = V>,
    V: Into<SqlValue>,
{
    let mut template = SqlTemplate::default();
    if let Some(values) = values {
        template.append_in(column, values);
    }
    template
}

/// `(c1 like ? or c2 like ?)` with the keyword as a substring match.
pub fn like(columns: &[&str], keyword: Option<&str>) -> SqlTemplate {
    let keyword = match keyword.map(str::trim) {
        Some(k) if !k.is_empty() => k,
        _ => return SqlTemplate::default(),
    };
    let pattern = format!("%{}%", escape_like(keyword));

    let mut any = SqlTemplate::default();
    for column in columns {
        any.append(format!("{} like ?", column), vec![pattern.clone().into()]);
    }
    if any.is_empty() {
        return any;
    }
    let mut template = SqlTemplate::default();
    template.append_result(any.or());
    template
}

/// Half-open range `start <= column < end`; either bound may be absent.
pub fn range(column: &str, start: Option<i64>, end: Option<i64>) -> SqlTemplate {
    let mut template = SqlTemplate::default();
    if let Some(start) = start {
        template.append(format!("{} >= ?", column), vec![start.into()]);
    }
    if let Some(end) = end {
        template.append(format!("{} < ?", column), vec![end.into()]);
    }
    template
}

/// `column = 0` unless deleted rows are requested.
pub fn not_deleted(column: &str, include_deleted: bool) -> SqlTemplate {
    if include_deleted {
        return SqlTemplate::default();
    }
    SqlTemplate::new(format!("{} = 0", column), Vec::new())
}

fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
