use serde::{Deserialize, Serialize};

use crate::domain::value_objects::AssessmentStatus;

/// An assessment attached to a scheduled lesson.
///
/// Timestamps are unix seconds; `delete_at == 0` marks a live row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: String,
    pub org_id: String,
    pub schedule_id: String,
    pub title: String,
    pub status: AssessmentStatus,
    pub complete_at: i64,
    pub create_at: i64,
    pub update_at: i64,
    pub delete_at: i64,
}

impl Assessment {
    pub fn is_deleted(&self) -> bool {
        self.delete_at != 0
    }

    pub fn is_complete(&self) -> bool {
        self.status == AssessmentStatus::Complete
    }
}
