use serde::{Deserialize, Serialize};

use super::filters::{eq, in_list, like, not_deleted};
use super::{Pager, QueryCondition};
use crate::domain::value_objects::PublishStatus;
use crate::sql::SqlTemplate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeOrderBy {
    #[default]
    UpdateAtDesc,
    NameAsc,
    ShortcodeAsc,
}

impl OutcomeOrderBy {
    pub fn to_sql(self) -> &'static str {
        match self {
            OutcomeOrderBy::UpdateAtDesc => "update_at desc",
            OutcomeOrderBy::NameAsc => "name asc",
            OutcomeOrderBy::ShortcodeAsc => "shortcode asc",
        }
    }
}

impl std::str::FromStr for OutcomeOrderBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "update_at_desc" | "-updated_at" => Ok(OutcomeOrderBy::UpdateAtDesc),
            "name_asc" | "name" => Ok(OutcomeOrderBy::NameAsc),
            "shortcode_asc" | "shortcode" => Ok(OutcomeOrderBy::ShortcodeAsc),
            _ => Err(format!("Invalid outcome order: {}", s)),
        }
    }
}

/// Filters over the `learning_outcomes` table. Also the cache key of the
/// outcome search, so field order must stay stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomeCondition {
    pub org_id: Option<String>,
    pub ids: Option<Vec<String>>,
    pub author_id: Option<String>,
    pub publish_statuses: Option<Vec<PublishStatus>>,
    pub keywords: Option<String>,
    pub assessed: Option<bool>,
    pub include_deleted: bool,
    pub pager: Pager,
    pub order_by: OutcomeOrderBy,
}

impl QueryCondition for OutcomeCondition {
    fn conditions(&self) -> SqlTemplate {
        let statuses = self
            .publish_statuses
            .as_ref()
            .map(|list| list.iter().map(|s| s.as_str()).collect::<Vec<_>>());

        let mut t = SqlTemplate::default();
        t.append_templates([
            &eq("organization_id", self.org_id.as_deref()),
            &in_list("id", self.ids.as_ref()),
            &eq("author_id", self.author_id.as_deref()),
            &in_list("publish_status", statuses),
            &like(&["name", "shortcode", "keywords"], self.keywords.as_deref()),
            &eq("assessed", self.assessed),
            &not_deleted("delete_at", self.include_deleted),
        ]);
        t
    }

    fn pager(&self) -> Pager {
        self.pager
    }

    fn order_by(&self) -> Option<String> {
        Some(self.order_by.to_sql().to_string())
    }
}
