pub mod assessments;
pub mod health;
pub mod health_checks;
pub mod outcomes;
pub mod reports;


pub use assessments::{attach_outcomes_handler, get_assessment_handler};
pub use health::{health_handler, readiness_handler};
pub use health_checks::HealthState;
pub use outcomes::search_outcomes_handler;
pub use reports::teacher_usage_handler;
