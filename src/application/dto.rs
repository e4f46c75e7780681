use serde::{Deserialize, Serialize};

use crate::domain::entities::{Assessment, Outcome, TeacherUsage};
use crate::domain::value_objects::{AssessmentStatus, PublishStatus};

/// Cache request of the assessment lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentByIdRequest {
    pub org_id: String,
    pub id: String,
}

/// Assessment with the ids of its linked outcomes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentDetail {
    pub assessment: Assessment,
    pub outcome_ids: Vec<String>,
}

/// DTO for assessment responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentDto {
    pub id: String,
    pub org_id: String,
    pub schedule_id: String,
    pub title: String,
    pub status: AssessmentStatus,
    pub complete_at: i64,
    pub create_at: i64,
    pub update_at: i64,
    pub outcome_ids: Vec<String>,
}

impl From<AssessmentDetail> for AssessmentDto {
    fn from(detail: AssessmentDetail) -> Self {
        let a = detail.assessment;
        Self {
            id: a.id,
            org_id: a.org_id,
            schedule_id: a.schedule_id,
            title: a.title,
            status: a.status,
            complete_at: a.complete_at,
            create_at: a.create_at,
            update_at: a.update_at,
            outcome_ids: detail.outcome_ids,
        }
    }
}

/// DTO for outcome search query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchOutcomesRequest {
    pub org_id: String,
    pub keywords: Option<String>,
    pub author_id: Option<String>,
    /// Comma-separated publish statuses
    pub publish_status: Option<String>,
    pub assessed: Option<bool>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub order_by: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeDto {
    pub id: String,
    pub name: String,
    pub shortcode: String,
    pub keywords: Vec<String>,
    pub author_id: String,
    pub publish_status: PublishStatus,
    pub assessed: bool,
    pub update_at: i64,
}

impl From<Outcome> for OutcomeDto {
    fn from(outcome: Outcome) -> Self {
        Self {
            id: outcome.id,
            name: outcome.name,
            shortcode: outcome.shortcode,
            keywords: outcome
                .keywords
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect(),
            author_id: outcome.author_id,
            publish_status: outcome.publish_status,
            assessed: outcome.assessed,
            update_at: outcome.update_at,
        }
    }
}

/// Cached page of outcomes plus the unpaged total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomePage {
    pub total: i64,
    pub outcomes: Vec<Outcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcomesResponse {
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub outcomes: Vec<OutcomeDto>,
}

/// DTO for teacher usage query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeacherUsageRequest {
    pub org_id: String,
    /// Comma-separated teacher ids
    pub teacher_ids: Option<String>,
    pub start: Option<i64>,
    pub end: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherUsageDto {
    pub teacher_id: String,
    pub assessment_count: i64,
    pub completed_count: i64,
    pub completion_rate: f64,
}

impl From<TeacherUsage> for TeacherUsageDto {
    fn from(usage: TeacherUsage) -> Self {
        let completion_rate = usage.completion_rate();
        Self {
            teacher_id: usage.teacher_id,
            assessment_count: usage.assessment_count,
            completed_count: usage.completed_count,
            completion_rate,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherUsageReport {
    pub org_id: String,
    pub rows: Vec<TeacherUsageDto>,
}

/// DTO for linking outcomes to an assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachOutcomesRequest {
    pub org_id: String,
    pub outcome_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachOutcomesResponse {
    pub assessment_id: String,
    pub attached: u64,
    pub already_linked: Vec<String>,
}

/// Splits a comma-separated query parameter, dropping blanks.
pub fn split_list(raw: Option<&str>) -> Option<Vec<String>> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(None), None);
        assert_eq!(
            split_list(Some("a, b,,c ")),
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn test_teacher_usage_dto_rate() {
        let dto = TeacherUsageDto::from(TeacherUsage {
            teacher_id: "t".to_string(),
            assessment_count: 2,
            completed_count: 1,
        });
        assert_eq!(dto.completion_rate, 50.0);
    }
}
