use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use household_eligibility::eligibility::{
    eligibility_router, EligibilityService, HouseholdRepository,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_eligibility_routes<R>(service: Arc<EligibilityService<R>>) -> axum::Router
where
    R: HouseholdRepository + 'static,
{
    eligibility_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use household_eligibility::eligibility::{
        EvaluationConfig, HouseholdId, HouseholdRow, IncomeBasis, SqliteHouseholdRepository,
    };
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let repository =
            SqliteHouseholdRepository::open_in_memory(IncomeBasis::Monthly).expect("opens");
        repository
            .store(
                &[HouseholdRow {
                    household_id: HouseholdId::from("hh-1"),
                    stored_income: 4_000.0,
                    is_unstable: false,
                    household_size: Some(1),
                }],
                &[],
            )
            .expect("store succeeds");
        let service = Arc::new(EligibilityService::new(
            Arc::new(repository),
            EvaluationConfig::new(61_680.0).expect("positive threshold"),
        ));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };

        with_eligibility_routes(service).layer(Extension(state))
    }

    async fn call(router: axum::Router, method: &str, uri: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(
                axum::http::Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 4096)
            .await
            .expect("read body");
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn readiness_tracks_listener_state() {
        let (status, body) = call(app(false), "GET", "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("initializing"));

        let (status, body) = call(app(true), "GET", "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("ready"));
    }

    #[tokio::test]
    async fn eligibility_is_served_alongside_operational_routes() {
        let (status, body) = call(app(true), "POST", "/eligibility/hh-1").await;
        assert_eq!(status, StatusCode::OK);

        let payload: serde_json::Value = serde_json::from_str(&body).expect("json payload");
        assert_eq!(payload["resident_assistance_eligibility"], json!(true));
        assert_eq!(payload["reduced_bus_fare_eligibility"], json!(false));
    }

    #[tokio::test]
    async fn metrics_endpoint_uses_prometheus_text_format() {
        let router = app(true);
        let response = router
            .oneshot(
                axum::http::Request::get("/metrics")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }
}
