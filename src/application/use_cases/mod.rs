mod attach_outcomes;
mod get_assessment;
mod search_outcomes;
mod teacher_usage_report;

pub use attach_outcomes::AttachOutcomesUseCase;
pub use get_assessment::GetAssessmentUseCase;
pub use search_outcomes::SearchOutcomesUseCase;
pub use teacher_usage_report::TeacherUsageReportUseCase;
