use serde::{Deserialize, Serialize};

use super::filters::{in_list, not_deleted};
use super::QueryCondition;
use crate::sql::SqlTemplate;

/// Filters over `assessments_outcomes`.
///
/// `pairs` renders as an OR group of `(assessment_id, outcome_id)` matches
/// nested inside the AND list of the other filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentOutcomeCondition {
    pub assessment_ids: Option<Vec<String>>,
    pub outcome_ids: Option<Vec<String>>,
    pub pairs: Option<Vec<(String, String)>>,
    pub include_deleted: bool,
}

impl AssessmentOutcomeCondition {
    fn pair_group(&self) -> SqlTemplate {
        let mut t = SqlTemplate::default();
        let Some(pairs) = &self.pairs else {
            return t;
        };
        if pairs.is_empty() {
            t.append("1 = 0", Vec::new());
            return t;
        }

        let mut any = SqlTemplate::default();
        for (assessment_id, outcome_id) in pairs {
            any.append(
                "(assessment_id = ? and outcome_id = ?)",
                vec![assessment_id.into(), outcome_id.into()],
            );
        }
        t.append_result(any.or());
        t
    }
}

impl QueryCondition for AssessmentOutcomeCondition {
    fn conditions(&self) -> SqlTemplate {
        let mut t = SqlTemplate::default();
        t.append_templates([
            &in_list("assessment_id", self.assessment_ids.as_ref()),
            &in_list("outcome_id", self.outcome_ids.as_ref()),
            &self.pair_group(),
            &not_deleted("delete_at", self.include_deleted),
        ]);
        t
    }
}
