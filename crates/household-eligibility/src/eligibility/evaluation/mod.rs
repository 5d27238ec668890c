mod config;
mod policy;
mod rules;

pub use config::{EvaluationConfig, ThresholdError};
pub use policy::EligibilityResult;
pub use rules::{age_in_years, is_senior, RecipientSignals, DAYS_PER_YEAR, SENIOR_AGE_YEARS};

use super::domain::{Household, HouseholdId, Recipient};
use chrono::NaiveDate;
use policy::decide_outcome;
use serde::{Deserialize, Serialize};

/// Stateless evaluator that applies the threshold configuration to a household snapshot.
#[derive(Debug, Clone)]
pub struct EligibilityEvaluator {
    config: EvaluationConfig,
}

impl EligibilityEvaluator {
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn evaluate(
        &self,
        household: &Household,
        recipients: &[Recipient],
        as_of: NaiveDate,
    ) -> EligibilityResult {
        self.assess(household, recipients, as_of).result
    }

    /// Evaluate and keep the intermediate signals for audit logging.
    pub fn assess(
        &self,
        household: &Household,
        recipients: &[Recipient],
        as_of: NaiveDate,
    ) -> EligibilityAssessment {
        let income_eligible = rules::income_within_threshold(household, &self.config);
        let signals = rules::aggregate_recipients(recipients, as_of);
        let result = decide_outcome(income_eligible, household.is_unstable, &signals);

        EligibilityAssessment {
            household_id: household.household_id.clone(),
            as_of,
            income_eligible,
            is_unstable: household.is_unstable,
            recipient_count: recipients.len(),
            recipients: signals,
            result,
        }
    }
}

/// Free-standing form of [`EligibilityEvaluator::evaluate`].
pub fn evaluate(
    household: &Household,
    recipients: &[Recipient],
    as_of: NaiveDate,
    config: &EvaluationConfig,
) -> EligibilityResult {
    EligibilityEvaluator::new(*config).evaluate(household, recipients, as_of)
}

/// Evaluation output with the decision trail that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityAssessment {
    pub household_id: HouseholdId,
    pub as_of: NaiveDate,
    pub income_eligible: bool,
    pub is_unstable: bool,
    pub recipient_count: usize,
    pub recipients: RecipientSignals,
    pub result: EligibilityResult,
}
