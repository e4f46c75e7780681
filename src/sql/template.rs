use super::errors::SqlTemplateError;
use super::value::SqlValue;

/// One predicate clause: a format string and the values its placeholders bind.
#[derive(Debug, Clone, PartialEq)]
struct Fragment {
    format: String,
    values: Vec<SqlValue>,
}

/// Append-only list of SQL fragments with their positional parameters.
///
/// Every append with an empty format is a no-op, so condition structs can
/// append one fragment per optional filter and let absent filters vanish:
///
/// ```
/// use lesson_store::{params, sql::SqlTemplate};
///
/// let org: Option<&str> = Some("org-1");
/// let mut t = SqlTemplate::new("delete_at = 0", params![]);
/// t.append(if org.is_some() { "org_id = ?" } else { "" }, params![org]);
/// t.append("", params![]);
///
/// let (sql, values) = t.and();
/// assert_eq!(sql, "(delete_at = 0 and org_id = ?)");
/// assert_eq!(values.len(), 1);
/// ```
///
/// The separator is chosen only when the template is consumed (`and`, `or`,
/// `concat`, `join`, `dbo_conditions`), which lets the same accumulation
/// serve top-level WHERE lists and nested OR groups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlTemplate {
    fragments: Vec<Fragment>,
}

impl SqlTemplate {
    /// Creates a template holding one fragment, or nothing if `format` is empty.
    pub fn new(format: impl Into<String>, values: Vec<SqlValue>) -> Self {
        let mut template = Self::default();
        template.append(format, values);
        template
    }

    /// Appends one fragment. No-op when `format` is empty.
    pub fn append(&mut self, format: impl Into<String>, values: Vec<SqlValue>) -> &mut Self {
        let format = format.into();
        if format.is_empty() {
            return self;
        }
        self.fragments.push(Fragment { format, values });
        self
    }

    /// Appends the output of a terminal operation of a nested template,
    /// e.g. `outer.append_result(inner.or())`.
    pub fn append_result(&mut self, result: (String, Vec<SqlValue>)) -> &mut Self {
        let (format, values) = result;
        self.append(format, values)
    }

    /// Merges the fragments of other templates, keeping their relative order.
    ///
    /// Accepts `&SqlTemplate` or `Option<&SqlTemplate>`; `None` and empty
    /// templates contribute nothing.
    pub fn append_templates<'a, I, T>(&mut self, others: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Option<&'a SqlTemplate>>,
    {
        for other in others.into_iter().filter_map(Into::into) {
            self.fragments.extend(other.fragments.iter().cloned());
        }
        self
    }

    /// Appends `column in (?,?,...)`.
    ///
    /// An empty value list appends `1 = 0`: a filter on "any of nothing"
    /// matches no rows rather than being dropped.
    pub fn append_in<V>(&mut self, column: &str, values: impl IntoIterator<Item = V>) -> &mut Self
    where
        V: Into<SqlValue>,
    {
        let values: Vec<SqlValue> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return self.append("1 = 0", Vec::new());
        }
        let format = format!("{} in ({})", column, in_placeholders(values.len()));
        self.append(format, values)
    }

    /// Joins all fragments with `sep` and wraps the result in `left`/`right`.
    pub fn join(&self, sep: &str, left: &str, right: &str) -> (String, Vec<SqlValue>) {
        let formats: Vec<&str> = self.fragments.iter().map(|f| f.format.as_str()).collect();
        (
            format!("{}{}{}", left, formats.join(sep), right),
            self.values(),
        )
    }

    pub fn and(&self) -> (String, Vec<SqlValue>) {
        self.join(" and ", "(", ")")
    }

    pub fn or(&self) -> (String, Vec<SqlValue>) {
        self.join(" or ", "(", ")")
    }

    pub fn concat(&self) -> (String, Vec<SqlValue>) {
        self.join("", "", "")
    }

    /// Fragments and flattened values as separate lists, the shape consumed
    /// by the paging executor (which joins fragments with `" and "`).
    pub fn dbo_conditions(&self) -> (Vec<String>, Vec<SqlValue>) {
        (
            self.fragments.iter().map(|f| f.format.clone()).collect(),
            self.values(),
        )
    }

    /// All bound values in fragment order.
    pub fn values(&self) -> Vec<SqlValue> {
        self.fragments
            .iter()
            .flat_map(|f| f.values.iter().cloned())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Number of fragments.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Checks that each fragment binds exactly as many values as it has
    /// placeholders.
    pub fn validate(&self) -> Result<(), SqlTemplateError> {
        for (index, fragment) in self.fragments.iter().enumerate() {
            let placeholders = count_placeholders(&fragment.format);
            if placeholders != fragment.values.len() {
                return Err(SqlTemplateError::PlaceholderMismatch {
                    index,
                    format: fragment.format.clone(),
                    placeholders,
                    values: fragment.values.len(),
                });
            }
        }
        Ok(())
    }
}

/// `n` comma-separated `?` placeholders, e.g. `?,?,?`.
pub fn in_placeholders(n: usize) -> String {
    let mut s = String::with_capacity(n * 2);
    for i in 0..n {
        if i > 0 {
            s.push(',');
        }
        s.push('?');
    }
    s
}

/// Counts `?` placeholders that are not inside quoted literals or identifiers.
pub fn count_placeholders(format: &str) -> usize {
    let mut count = 0;
    let mut quote: Option<char> = None;
    for c in format.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' | '`' => quote = Some(c),
                '?' => count += 1,
                _ => {}
            },
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;

    #[test]
    fn test_empty_format_is_skipped() {
        let mut t = SqlTemplate::new("", params![1]);
        t.append("", params!["a", "b"]);

        assert!(t.is_empty());
        assert_eq!(t.concat(), (String::new(), vec![]));
        assert_eq!(t.and(), ("()".to_string(), vec![]));
    }

    #[test]
    fn test_concat_orders_values_left_to_right() {
        let mut t = SqlTemplate::default();
        t.append("a = ? and b = ?", params![1, 2]);
        t.append(" or c = ?", params![3]);
        t.append("", params![]);

        let (sql, values) = t.concat();
        assert_eq!(sql, "a = ? and b = ? or c = ?");
        assert_eq!(values, params![1, 2, 3]);
    }

    #[test]
    fn test_and_or_wrap_in_parentheses() {
        let mut t = SqlTemplate::new("x = ?", params![1]);
        t.append("y = ?", params![2]);

        assert_eq!(t.and().0, "(x = ? and y = ?)");
        assert_eq!(t.or().0, "(x = ? or y = ?)");
    }

    #[test]
    fn test_and_is_repeatable() {
        let mut t = SqlTemplate::new("x = ?", params!["v"]);
        t.append("y in (?,?)", params![1, 2]);

        assert_eq!(t.and(), t.and());
    }

    #[test]
    fn test_append_result_nests_or_group() {
        let mut pairs = SqlTemplate::default();
        pairs.append("(assessment_id = ? and outcome_id = ?)", params!["a1", "o1"]);
        pairs.append("(assessment_id = ? and outcome_id = ?)", params!["a2", "o2"]);

        let mut t = SqlTemplate::new("delete_at = 0", params![]);
        t.append_result(pairs.or());

        let (formats, values) = t.dbo_conditions();
        assert_eq!(formats.len(), 2);
        assert_eq!(
            formats[1],
            "((assessment_id = ? and outcome_id = ?) or (assessment_id = ? and outcome_id = ?))"
        );
        assert_eq!(values, params!["a1", "o1", "a2", "o2"]);
    }

    #[test]
    fn test_append_templates_skips_none_and_empty() {
        let a = SqlTemplate::new("a = ?", params![1]);
        let empty = SqlTemplate::default();
        let b = SqlTemplate::new("b = ?", params![2]);

        let mut t = SqlTemplate::new("z = ?", params![0]);
        t.append_templates([Some(&a), None, Some(&empty), Some(&b)]);

        assert_eq!(t.len(), 3);
        assert_eq!(t.and(), ("(z = ? and a = ? and b = ?)".to_string(), params![0, 1, 2]));
    }

    #[test]
    fn test_append_templates_accepts_plain_references() {
        let a = SqlTemplate::new("a = ?", params![1]);
        let mut t = SqlTemplate::default();
        t.append_templates([&a, &a]);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_append_in() {
        let mut t = SqlTemplate::default();
        t.append_in("id", ["a", "b", "c"]);
        assert_eq!(t.concat(), ("id in (?,?,?)".to_string(), params!["a", "b", "c"]));
    }

    #[test]
    fn test_append_in_empty_matches_nothing() {
        let mut t = SqlTemplate::default();
        t.append_in("id", Vec::<String>::new());
        assert_eq!(t.concat().0, "1 = 0");
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_validate_detects_mismatch() {
        let mut t = SqlTemplate::new("a = ?", params![1]);
        t.append("b = ? and c = ?", params![2]);

        let err = t.validate().unwrap_err();
        assert_eq!(
            err,
            SqlTemplateError::PlaceholderMismatch {
                index: 1,
                format: "b = ? and c = ?".to_string(),
                placeholders: 2,
                values: 1,
            }
        );
    }

    #[test]
    fn test_count_placeholders_ignores_quoted() {
        assert_eq!(count_placeholders("a = ? and b = '?' and `c?` = ?"), 2);
        assert_eq!(count_placeholders("name like 'it''s?' or x = ?"), 1);
        assert_eq!(count_placeholders("no placeholders"), 0);
    }

    #[test]
    fn test_in_placeholders() {
        assert_eq!(in_placeholders(0), "");
        assert_eq!(in_placeholders(1), "?");
        assert_eq!(in_placeholders(3), "?,?,?");
    }
}
