mod assessment_status;
mod publish_status;

pub use assessment_status::AssessmentStatus;
pub use publish_status::PublishStatus;
