use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{Duration, NaiveDate};
use serde_json::Value;

use crate::eligibility::domain::{Household, HouseholdId, Recipient};
use crate::eligibility::repository::{HouseholdRepository, HouseholdSnapshot, RepositoryError};
use crate::eligibility::{eligibility_router, EligibilityService, EvaluationConfig};

/// Spokane, WA figure as of July 2021.
pub(super) const ANNUAL_THRESHOLD: f64 = 61_680.0;

pub(super) fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
}

pub(super) fn evaluation_config() -> EvaluationConfig {
    EvaluationConfig::new(ANNUAL_THRESHOLD).expect("positive threshold")
}

pub(super) fn household(id: &str, monthly_income: f64, is_unstable: bool) -> Household {
    Household {
        household_id: HouseholdId::from(id),
        monthly_income,
        is_unstable,
        household_size: Some(2),
    }
}

/// Recipient whose age on [`as_of`] is `years` whole 365.25-day years, rounded up to a day.
pub(super) fn recipient_aged(years: i64) -> Recipient {
    let days = (years as f64 * 365.25).ceil() as i64;
    Recipient::born_on(as_of() - Duration::days(days))
}

pub(super) fn disabled_child() -> Recipient {
    let mut recipient = recipient_aged(10);
    recipient.has_disability = true;
    recipient
}

pub(super) fn veteran_adult() -> Recipient {
    let mut recipient = recipient_aged(40);
    recipient.veteran = true;
    recipient
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    households: Arc<Mutex<HashMap<HouseholdId, Household>>>,
    recipients: Arc<Mutex<HashMap<HouseholdId, Vec<Recipient>>>>,
}

impl MemoryRepository {
    pub(super) fn with(self, household: Household, recipients: Vec<Recipient>) -> Self {
        let id = household.household_id.clone();
        self.households
            .lock()
            .expect("repository mutex poisoned")
            .insert(id.clone(), household);
        self.recipients
            .lock()
            .expect("repository mutex poisoned")
            .insert(id, recipients);
        self
    }
}

impl HouseholdRepository for MemoryRepository {
    fn household(&self, id: &HouseholdId) -> Result<Option<Household>, RepositoryError> {
        let guard = self.households.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn recipients(&self, id: &HouseholdId) -> Result<Vec<Recipient>, RepositoryError> {
        let guard = self.recipients.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned().unwrap_or_default())
    }
}

pub(super) struct UnavailableRepository;

impl HouseholdRepository for UnavailableRepository {
    fn household(&self, _id: &HouseholdId) -> Result<Option<Household>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn recipients(&self, _id: &HouseholdId) -> Result<Vec<Recipient>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Household lookups succeed but the recipient table holds garbage.
pub(super) struct CorruptRecipientsRepository;

impl HouseholdRepository for CorruptRecipientsRepository {
    fn household(&self, id: &HouseholdId) -> Result<Option<Household>, RepositoryError> {
        Ok(Some(household(id.as_str(), 1_000.0, false)))
    }

    fn recipients(&self, _id: &HouseholdId) -> Result<Vec<Recipient>, RepositoryError> {
        Err(RepositoryError::Malformed(
            "unparseable date of birth".to_string(),
        ))
    }
}

/// Only answers whole-household snapshots; the piecewise reads refuse.
pub(super) struct SnapshotOnlyRepository {
    pub(super) snapshot: HouseholdSnapshot,
}

impl HouseholdRepository for SnapshotOnlyRepository {
    fn household(&self, _id: &HouseholdId) -> Result<Option<Household>, RepositoryError> {
        Err(RepositoryError::Unavailable("piecewise read".to_string()))
    }

    fn recipients(&self, _id: &HouseholdId) -> Result<Vec<Recipient>, RepositoryError> {
        Err(RepositoryError::Unavailable("piecewise read".to_string()))
    }

    fn snapshot(&self, id: &HouseholdId) -> Result<Option<HouseholdSnapshot>, RepositoryError> {
        Ok((self.snapshot.household.household_id == *id).then(|| self.snapshot.clone()))
    }
}

pub(super) fn build_service(
    repository: MemoryRepository,
) -> EligibilityService<MemoryRepository> {
    EligibilityService::new(Arc::new(repository), evaluation_config())
}

pub(super) fn eligibility_router_with_service(
    service: EligibilityService<MemoryRepository>,
) -> axum::Router {
    eligibility_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
