use crate::infra::{AppState, SummaryContext};
use axum::extract::rejection::JsonRejection;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use payroll_summary::error::AppError;
use payroll_summary::payroll::{AgencyMonthReport, ExecutionResult};
use serde_json::json;
use tracing::warn;

pub(crate) fn with_summary_routes(context: SummaryContext) -> axum::Router {
    axum::Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/agency-months",
            axum::routing::post(agency_month_endpoint),
        )
        .layer(Extension(context))
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

/// Builds the report for one agency-month. Each request gets its own
/// dictionary snapshot.
pub(crate) async fn agency_month_endpoint(
    Extension(context): Extension<SummaryContext>,
    payload: Result<Json<ExecutionResult>, JsonRejection>,
) -> Result<Json<AgencyMonthReport>, AppError> {
    let Json(payload) = payload?;
    let agency = payload.collection.agency_id.clone();
    let report = tokio::task::spawn_blocking(move || context.build(&payload))
        .await
        .map_err(|err| AppError::Task(err.to_string()))?
        .inspect_err(|err| warn!(%agency, error = %err, "agency-month report failed"))?;

    Ok(Json(report))
}
