use serde::{Deserialize, Serialize};

const MONTHS_PER_YEAR: f64 = 12.0;

/// Jurisdiction and year specific policy inputs for the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEvaluationConfig")]
pub struct EvaluationConfig {
    annual_income_threshold: f64,
}

impl EvaluationConfig {
    pub fn new(annual_income_threshold: f64) -> Result<Self, ThresholdError> {
        if !annual_income_threshold.is_finite() {
            return Err(ThresholdError::NotFinite);
        }
        if annual_income_threshold <= 0.0 {
            return Err(ThresholdError::NonPositive(annual_income_threshold));
        }

        Ok(Self {
            annual_income_threshold,
        })
    }

    pub fn annual_income_threshold(&self) -> f64 {
        self.annual_income_threshold
    }

    pub fn monthly_income_threshold(&self) -> f64 {
        self.annual_income_threshold / MONTHS_PER_YEAR
    }
}

#[derive(Deserialize)]
struct RawEvaluationConfig {
    annual_income_threshold: f64,
}

impl TryFrom<RawEvaluationConfig> for EvaluationConfig {
    type Error = ThresholdError;

    fn try_from(raw: RawEvaluationConfig) -> Result<Self, Self::Error> {
        Self::new(raw.annual_income_threshold)
    }
}

/// Rejected income threshold value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ThresholdError {
    #[error("annual income threshold must be positive, got {0}")]
    NonPositive(f64),
    #[error("annual income threshold must be a finite number")]
    NotFinite,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monthly_threshold_is_a_twelfth_of_annual() {
        let config = EvaluationConfig::new(61_680.0).expect("positive threshold");
        assert_eq!(config.monthly_income_threshold(), 5_140.0);
    }

    #[test]
    fn rejects_non_positive_and_non_finite_thresholds() {
        assert_eq!(
            EvaluationConfig::new(0.0),
            Err(ThresholdError::NonPositive(0.0))
        );
        assert_eq!(
            EvaluationConfig::new(-1.0),
            Err(ThresholdError::NonPositive(-1.0))
        );
        assert_eq!(
            EvaluationConfig::new(f64::NAN),
            Err(ThresholdError::NotFinite)
        );
    }

    #[test]
    fn deserialization_applies_the_same_validation() {
        let parsed: EvaluationConfig =
            serde_json::from_str(r#"{ "annual_income_threshold": 61680 }"#).expect("valid");
        assert_eq!(parsed.annual_income_threshold(), 61_680.0);

        let rejected =
            serde_json::from_str::<EvaluationConfig>(r#"{ "annual_income_threshold": -5 }"#);
        assert!(rejected.is_err());
    }
}
