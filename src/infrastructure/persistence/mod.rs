mod executor;
mod mysql_assessment_repository;
mod mysql_outcome_repository;
mod mysql_report_repository;

pub use executor::{build_count, build_select, to_arguments, MySqlExecutor};
pub use mysql_assessment_repository::MySqlAssessmentRepository;
pub use mysql_outcome_repository::MySqlOutcomeRepository;
pub use mysql_report_repository::MySqlReportRepository;
