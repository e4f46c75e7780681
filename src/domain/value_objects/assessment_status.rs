use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Assessment progress as stored in `assessments.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    InProgress,
    Complete,
}

impl AssessmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssessmentStatus::InProgress => "in_progress",
            AssessmentStatus::Complete => "complete",
        }
    }
}

impl std::fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AssessmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(AssessmentStatus::InProgress),
            "complete" => Ok(AssessmentStatus::Complete),
            _ => Err(DomainError::UnknownStatus {
                kind: "assessment status",
                value: s.to_string(),
            }),
        }
    }
}
