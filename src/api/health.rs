use crate::api::MgmtState;
use crate::api::schemas::health::HealthResponse;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

/// Liveness probe: returns 200 OK as long as the server is running.
pub async fn livez() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness probe: checks connectivity to the upstream backend.
pub async fn readyz(State(state): State<MgmtState>) -> impl IntoResponse {
    let mut status_code = StatusCode::OK;

    let upstream_status = if let Err(e) = state.health_service.check_upstream().await {
        tracing::warn!(error = %e, component = "upstream", "Readiness probe failed");
        status_code = StatusCode::SERVICE_UNAVAILABLE;
        "error"
    } else {
        "ok"
    };

    let response = HealthResponse {
        status: if status_code == StatusCode::OK { "ok" } else { "error" }.to_string(),
        upstream: upstream_status.to_string(),
    };

    (status_code, Json(response))
}
