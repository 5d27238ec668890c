use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::json;
use tracing::warn;

use super::domain::HouseholdId;
use super::repository::HouseholdRepository;
use super::service::{EligibilityService, EligibilityServiceError};

/// Router builder exposing the eligibility endpoint.
pub fn eligibility_router<R>(service: Arc<EligibilityService<R>>) -> Router
where
    R: HouseholdRepository + 'static,
{
    Router::new()
        .route(
            "/eligibility/:household_id",
            post(eligibility_handler::<R>),
        )
        .with_state(service)
}

/// Optional evaluation date; the handler falls back to today's UTC date.
#[derive(Debug, Default, Deserialize)]
pub struct EvaluationQuery {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub as_of: Option<NaiveDate>,
}

pub(crate) async fn eligibility_handler<R>(
    State(service): State<Arc<EligibilityService<R>>>,
    Path(household_id): Path<String>,
    Query(query): Query<EvaluationQuery>,
) -> Response
where
    R: HouseholdRepository + 'static,
{
    let id = HouseholdId(household_id);
    let as_of = query.as_of.unwrap_or_else(|| Utc::now().date_naive());

    // Repository reads are blocking I/O; keep them off the runtime workers.
    let outcome = {
        let id = id.clone();
        tokio::task::spawn_blocking(move || service.evaluate(&id, as_of)).await
    };

    match outcome {
        Ok(Ok(assessment)) => (StatusCode::OK, axum::Json(assessment.result)).into_response(),
        Ok(Err(EligibilityServiceError::HouseholdNotFound(missing))) => {
            let payload = json!({
                "error": format!("household {missing} not found"),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Ok(Err(other)) => {
            warn!(household_id = %id, error = %other, "eligibility evaluation failed");
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
        Err(join_error) => {
            warn!(household_id = %id, error = %join_error, "eligibility task aborted");
            let payload = json!({
                "error": "eligibility evaluation aborted",
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.filter(|value| !value.trim().is_empty())
        .map(|value| {
            NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|err| {
                serde::de::Error::custom(format!(
                    "failed to parse '{value}' as YYYY-MM-DD ({err})"
                ))
            })
        })
        .transpose()
}
