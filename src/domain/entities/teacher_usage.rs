use serde::{Deserialize, Serialize};

/// One row of the teacher-usage report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherUsage {
    pub teacher_id: String,
    pub assessment_count: i64,
    pub completed_count: i64,
}

impl TeacherUsage {
    /// Completed share in percent, 0 when the teacher has no assessments.
    pub fn completion_rate(&self) -> f64 {
        if self.assessment_count == 0 {
            return 0.0;
        }
        self.completed_count as f64 * 100.0 / self.assessment_count as f64
    }
}
