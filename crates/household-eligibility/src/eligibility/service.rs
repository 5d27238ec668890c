use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use super::domain::HouseholdId;
use super::evaluation::{EligibilityAssessment, EligibilityEvaluator, EvaluationConfig};
use super::repository::{HouseholdRepository, RepositoryError};

/// Service composing the household repository and the eligibility evaluator.
pub struct EligibilityService<R> {
    repository: Arc<R>,
    evaluator: Arc<EligibilityEvaluator>,
}

impl<R> EligibilityService<R>
where
    R: HouseholdRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: EvaluationConfig) -> Self {
        Self {
            repository,
            evaluator: Arc::new(EligibilityEvaluator::new(config)),
        }
    }

    pub fn evaluator(&self) -> &EligibilityEvaluator {
        &self.evaluator
    }

    /// Fetch the household snapshot and evaluate it as of `as_of`.
    pub fn evaluate(
        &self,
        household_id: &HouseholdId,
        as_of: NaiveDate,
    ) -> Result<EligibilityAssessment, EligibilityServiceError> {
        let snapshot = self
            .repository
            .snapshot(household_id)?
            .ok_or_else(|| EligibilityServiceError::HouseholdNotFound(household_id.clone()))?;

        let assessment = self
            .evaluator
            .assess(&snapshot.household, &snapshot.recipients, as_of);

        debug!(
            household_id = %assessment.household_id,
            %as_of,
            income_eligible = assessment.income_eligible,
            is_unstable = assessment.is_unstable,
            recipients = assessment.recipient_count,
            signals = ?assessment.recipients,
            "eligibility signals"
        );
        info!(
            household_id = %assessment.household_id,
            resident_assistance = assessment.result.resident_assistance_eligible,
            reduced_fare = assessment.result.reduced_fare_eligible,
            "household evaluated"
        );

        Ok(assessment)
    }
}

/// Error raised by the eligibility service.
#[derive(Debug, thiserror::Error)]
pub enum EligibilityServiceError {
    #[error("household {0} not found")]
    HouseholdNotFound(HouseholdId),
    #[error("failed to fetch household data: {0}")]
    DataFetch(#[from] RepositoryError),
}
