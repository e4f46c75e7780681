mod assessment;
mod assessment_outcome;
mod outcome;
mod teacher_usage;

pub use assessment::Assessment;
pub use assessment_outcome::AssessmentOutcome;
pub use outcome::Outcome;
pub use teacher_usage::TeacherUsage;
