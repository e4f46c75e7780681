use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Publication state of a learning outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStatus {
    Draft,
    Pending,
    Published,
    Rejected,
    Hidden,
}

impl PublishStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishStatus::Draft => "draft",
            PublishStatus::Pending => "pending",
            PublishStatus::Published => "published",
            PublishStatus::Rejected => "rejected",
            PublishStatus::Hidden => "hidden",
        }
    }
}

impl std::fmt::Display for PublishStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PublishStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PublishStatus::Draft),
            "pending" => Ok(PublishStatus::Pending),
            "published" => Ok(PublishStatus::Published),
            "rejected" => Ok(PublishStatus::Rejected),
            "hidden" => Ok(PublishStatus::Hidden),
            _ => Err(DomainError::UnknownStatus {
                kind: "publish status",
                value: s.to_string(),
            }),
        }
    }
}
