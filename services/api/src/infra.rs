use chrono::NaiveDate;
use household_eligibility::config::DatabaseConfig;
use household_eligibility::eligibility::{RepositoryError, SqliteHouseholdRepository};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn open_repository(
    config: &DatabaseConfig,
) -> Result<Arc<SqliteHouseholdRepository>, RepositoryError> {
    let repository = SqliteHouseholdRepository::open(&config.path, config.income_basis)?;
    info!(
        path = %config.path.display(),
        income_basis = config.income_basis.label(),
        "household store opened"
    );
    Ok(Arc::new(repository))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
