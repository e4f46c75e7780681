use serde::{Deserialize, Serialize};

use crate::domain::value_objects::PublishStatus;

/// A learning outcome that assessments can be graded against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub id: String,
    pub org_id: String,
    pub name: String,
    pub shortcode: String,
    pub keywords: String,
    pub author_id: String,
    pub publish_status: PublishStatus,
    pub assessed: bool,
    pub create_at: i64,
    pub update_at: i64,
    pub delete_at: i64,
}
