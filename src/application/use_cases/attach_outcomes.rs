use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;

use crate::application::conditions::AssessmentOutcomeCondition;
use crate::application::dto::{AttachOutcomesRequest, AttachOutcomesResponse};
use crate::application::errors::AssessmentUseCaseError;
use crate::application::ports::AssessmentRepository;
use crate::domain::entities::AssessmentOutcome;

/// Use case: Link outcomes to an assessment, skipping existing links
///
/// Uncached. Cached assessment lookups pick the new links up on their next
/// refresh.
pub struct AttachOutcomesUseCase {
    assessment_repo: Arc<dyn AssessmentRepository>,
}

impl AttachOutcomesUseCase {
    pub fn new(assessment_repo: Arc<dyn AssessmentRepository>) -> Self {
        Self { assessment_repo }
    }

    pub async fn execute(
        &self,
        assessment_id: &str,
        request: &AttachOutcomesRequest,
    ) -> Result<AttachOutcomesResponse, AssessmentUseCaseError> {
        // 1. Normalize the requested ids, keeping first-seen order
        let mut seen = HashSet::new();
        let outcome_ids: Vec<String> = request
            .outcome_ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty() && seen.insert(*id))
            .map(str::to_string)
            .collect();
        if outcome_ids.is_empty() {
            return Err(AssessmentUseCaseError::InvalidRequest(
                "outcome_ids must not be empty".to_string(),
            ));
        }

        // 2. The assessment must exist in the organization
        let assessment = self
            .assessment_repo
            .find_by_id(&request.org_id, assessment_id)
            .await?
            .ok_or_else(|| AssessmentUseCaseError::NotFound(assessment_id.to_string()))?;

        // 3. Find links that already exist
        let pairs = outcome_ids
            .iter()
            .map(|outcome_id| (assessment.id.clone(), outcome_id.clone()))
            .collect();
        let existing = self
            .assessment_repo
            .find_outcome_links(&AssessmentOutcomeCondition {
                pairs: Some(pairs),
                ..Default::default()
            })
            .await?;
        let linked: HashSet<&str> = existing.iter().map(|l| l.outcome_id.as_str()).collect();

        // 4. Insert the rest in one statement
        let now = chrono::Utc::now().timestamp();
        let (already_linked, new_ids): (Vec<String>, Vec<String>) = outcome_ids
            .into_iter()
            .partition(|id| linked.contains(id.as_str()));
        let links: Vec<AssessmentOutcome> = new_ids
            .iter()
            .map(|outcome_id| AssessmentOutcome::new(assessment.id.as_str(), outcome_id.as_str(), now))
            .collect();

        let attached = self.assessment_repo.insert_outcome_links(&links).await?;
        info!(
            assessment_id = %assessment.id,
            attached,
            skipped = already_linked.len(),
            "Outcomes attached to assessment"
        );

        Ok(AttachOutcomesResponse {
            assessment_id: assessment.id,
            attached,
            already_linked,
        })
    }
}
