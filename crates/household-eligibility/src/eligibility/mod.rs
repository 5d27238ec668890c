//! Household eligibility for resident assistance and reduced transit fare.
//!
//! The evaluator is a pure function of a household snapshot, its recipients, an
//! evaluation date and the configured income threshold. Everything around it (the
//! repository, the service and the HTTP router) only moves data in and out.

pub mod domain;
pub mod evaluation;
pub mod import;
pub mod repository;
pub mod router;
pub mod service;
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use domain::{Household, HouseholdId, Recipient};
pub use evaluation::{
    evaluate, EligibilityAssessment, EligibilityEvaluator, EligibilityResult, EvaluationConfig,
    RecipientSignals, ThresholdError,
};
pub use import::{HouseholdImporter, ImportError, ImportSummary};
pub use repository::{HouseholdRepository, HouseholdSnapshot, IncomeBasis, RepositoryError};
pub use router::eligibility_router;
pub use service::{EligibilityService, EligibilityServiceError};
pub use sqlite::{HouseholdRow, RecipientRow, SqliteHouseholdRepository};
