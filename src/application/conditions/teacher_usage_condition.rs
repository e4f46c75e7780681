use serde::{Deserialize, Serialize};

use super::filters::{eq, in_list, range};
use super::QueryCondition;
use crate::domain::errors::DomainError;
use crate::sql::SqlTemplate;

/// Teacher-usage report filters. Columns are qualified for the
/// `assessments a join assessments_users au` report query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherUsageCondition {
    pub org_id: String,
    pub teacher_ids: Option<Vec<String>>,
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl TeacherUsageCondition {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.org_id.trim().is_empty() {
            return Err(DomainError::InvalidId {
                kind: "organization",
                value: self.org_id.clone(),
            });
        }
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(DomainError::InvalidTimeRange { start, end });
            }
        }
        Ok(())
    }
}

impl QueryCondition for TeacherUsageCondition {
    fn conditions(&self) -> SqlTemplate {
        let mut t = SqlTemplate::new("au.user_type = ?", vec!["teacher".into()]);
        t.append_templates([
            &eq("a.org_id", Some(self.org_id.as_str())),
            &in_list("au.user_id", self.teacher_ids.as_ref()),
            &range("a.create_at", self.start, self.end),
        ]);
        t.append("a.delete_at = 0", Vec::new());
        t
    }

    fn order_by(&self) -> Option<String> {
        Some("teacher_id asc".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;

    #[test]
    fn test_teacher_usage_fragments() {
        let condition = TeacherUsageCondition {
            org_id: "org".to_string(),
            teacher_ids: Some(vec!["t1".to_string()]),
            start: Some(1),
            end: None,
        };

        let (formats, values) = condition.conditions().dbo_conditions();
        assert_eq!(
            formats,
            vec![
                "au.user_type = ?",
                "a.org_id = ?",
                "au.user_id in (?)",
                "a.create_at >= ?",
                "a.delete_at = 0"
            ]
        );
        assert_eq!(values, params!["teacher", "org", "t1", 1i64]);
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let condition = TeacherUsageCondition {
            org_id: "org".to_string(),
            start: Some(10),
            end: Some(5),
            ..Default::default()
        };
        assert_eq!(
            condition.validate(),
            Err(DomainError::InvalidTimeRange { start: 10, end: 5 })
        );
    }

    #[test]
    fn test_validate_requires_org() {
        let condition = TeacherUsageCondition::default();
        assert!(matches!(condition.validate(), Err(DomainError::InvalidId { .. })));
    }
}
