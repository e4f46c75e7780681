//! Per-entity query conditions.
//!
//! A condition is a struct of optional filters. Each filter renders through
//! the helpers in [`filters`], which return an empty template when the filter
//! is absent, so `conditions()` stays a flat list of appends.

mod assessment_condition;
mod assessment_outcome_condition;
pub mod filters;
mod outcome_condition;
mod pager;
mod teacher_usage_condition;

pub use assessment_condition::{AssessmentCondition, AssessmentOrderBy};
pub use assessment_outcome_condition::AssessmentOutcomeCondition;
pub use outcome_condition::{OutcomeCondition, OutcomeOrderBy};
pub use pager::Pager;
pub use teacher_usage_condition::TeacherUsageCondition;

use crate::sql::SqlTemplate;

/// What the paging executor needs from a condition.
pub trait QueryCondition: Send + Sync {
    /// WHERE fragments, joined with `and` by the executor.
    fn conditions(&self) -> SqlTemplate;

    fn pager(&self) -> Pager {
        Pager::default()
    }

    /// Raw ORDER BY expression.
    fn order_by(&self) -> Option<String> {
        None
    }
}
