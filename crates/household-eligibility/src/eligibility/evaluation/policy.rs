use serde::{Deserialize, Serialize};

use super::rules::RecipientSignals;

/// Program decisions for one household. Field names are the public wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityResult {
    #[serde(rename = "resident_assistance_eligibility")]
    pub resident_assistance_eligible: bool,
    #[serde(rename = "reduced_bus_fare_eligibility")]
    pub reduced_fare_eligible: bool,
}

impl EligibilityResult {
    pub fn summary(&self) -> String {
        match (self.resident_assistance_eligible, self.reduced_fare_eligible) {
            (true, true) => "eligible for resident assistance and reduced fare".to_string(),
            (true, false) => "eligible for resident assistance only".to_string(),
            (false, true) => "eligible for reduced fare only".to_string(),
            (false, false) => "not eligible for either program".to_string(),
        }
    }
}

// Veteran status is aggregated upstream but deliberately not read here.
pub(crate) fn decide_outcome(
    income_eligible: bool,
    is_unstable: bool,
    recipients: &RecipientSignals,
) -> EligibilityResult {
    EligibilityResult {
        resident_assistance_eligible: income_eligible || is_unstable,
        reduced_fare_eligible: recipients.any_senior
            || recipients.any_disability
            || recipients.any_valid_ssi
            || recipients.any_valid_medicare,
    }
}
