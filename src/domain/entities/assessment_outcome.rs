use serde::{Deserialize, Serialize};

/// Link between an assessment and an outcome it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentOutcome {
    pub assessment_id: String,
    pub outcome_id: String,
    pub skip: bool,
    pub none_achieved: bool,
    pub checked: bool,
    pub create_at: i64,
    pub delete_at: i64,
}

impl AssessmentOutcome {
    pub fn new(assessment_id: impl Into<String>, outcome_id: impl Into<String>, now: i64) -> Self {
        Self {
            assessment_id: assessment_id.into(),
            outcome_id: outcome_id.into(),
            skip: false,
            none_achieved: false,
            checked: true,
            create_at: now,
            delete_at: 0,
        }
    }

    /// The `(assessment_id, outcome_id)` pair identifying this link.
    pub fn key(&self) -> (&str, &str) {
        (&self.assessment_id, &self.outcome_id)
    }
}
