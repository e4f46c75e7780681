use serde::{Deserialize, Serialize};

use super::filters::{eq, in_list, not_deleted, range};
use super::{Pager, QueryCondition};
use crate::domain::value_objects::AssessmentStatus;
use crate::sql::SqlTemplate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentOrderBy {
    CreateAtDesc,
    CompleteAtDesc,
    TitleAsc,
}

impl AssessmentOrderBy {
    pub fn to_sql(self) -> &'static str {
        match self {
            AssessmentOrderBy::CreateAtDesc => "create_at desc",
            AssessmentOrderBy::CompleteAtDesc => "complete_at desc",
            AssessmentOrderBy::TitleAsc => "title asc",
        }
    }
}

/// Filters over the `assessments` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentCondition {
    pub org_id: Option<String>,
    pub ids: Option<Vec<String>>,
    pub schedule_ids: Option<Vec<String>>,
    pub status: Option<AssessmentStatus>,
    pub complete_from: Option<i64>,
    pub complete_to: Option<i64>,
    pub include_deleted: bool,
    pub pager: Pager,
    pub order_by: Option<AssessmentOrderBy>,
}

impl QueryCondition for AssessmentCondition {
    fn conditions(&self) -> SqlTemplate {
        let mut t = SqlTemplate::default();
        t.append_templates([
            &eq("org_id", self.org_id.as_deref()),
            &in_list("id", self.ids.as_ref()),
            &in_list("schedule_id", self.schedule_ids.as_ref()),
            &eq("status", self.status.map(|s| s.as_str())),
            &range("complete_at", self.complete_from, self.complete_to),
            &not_deleted("delete_at", self.include_deleted),
        ]);
        t
    }

    fn pager(&self) -> Pager {
        self.pager
    }

    fn order_by(&self) -> Option<String> {
        self.order_by.map(|o| o.to_sql().to_string())
    }
}
