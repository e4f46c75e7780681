use super::template::SqlTemplate;
use super::value::SqlValue;

/// How `SqlBuilder` joins the templates it accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator {
    #[default]
    Space,
    And,
    Or,
    None,
}

/// Accumulates independently-built templates and merges them into a single
/// fragment.
///
/// `And` and `Or` results are parenthesised so the merged fragment keeps its
/// precedence when it is nested in another template.
#[derive(Debug, Clone, Default)]
pub struct SqlBuilder {
    separator: Separator,
    parts: SqlTemplate,
}

impl SqlBuilder {
    pub fn new(separator: Separator) -> Self {
        Self {
            separator,
            parts: SqlTemplate::default(),
        }
    }

    /// Adds every fragment of `template`. Empty templates are skipped.
    pub fn append(&mut self, template: &SqlTemplate) -> &mut Self {
        self.parts.append_templates([template]);
        self
    }

    /// Adds one fragment. No-op when `format` is empty.
    pub fn appendf(&mut self, format: impl Into<String>, values: Vec<SqlValue>) -> &mut Self {
        self.parts.append(format, values);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Merges everything into one template with a single fragment, or an
    /// empty template if nothing was added.
    pub fn build(&self) -> SqlTemplate {
        if self.parts.is_empty() {
            return SqlTemplate::default();
        }
        let result = match self.separator {
            Separator::Space => self.parts.join(" ", "", ""),
            Separator::And => self.parts.and(),
            Separator::Or => self.parts.or(),
            Separator::None => self.parts.concat(),
        };
        let mut template = SqlTemplate::default();
        template.append_result(result);
        template
    }
}
