use axum::{Json, Router, extract::State, routing::get};

use crate::{metrics::EndpointMetricsSnapshot, response::ApiResponse, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(prometheus_metrics))
        .route("/endpoints", get(endpoint_metrics))
}

#[utoipa::path(
    get,
    path = "/metrics",
    responses(
        (status = 200, description = "Prometheus exposition format", body = String, content_type = "text/plain")
    ),
    tag = "Metrics"
)]
pub async fn prometheus_metrics(State(state): State<AppState>) -> String {
    state
        .prometheus
        .as_ref()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

#[utoipa::path(
    get,
    path = "/metrics/endpoints",
    responses(
        (status = 200, description = "Per-endpoint counters", body = ApiResponse<EndpointMetricsSnapshot>)
    ),
    tag = "Metrics"
)]
pub async fn endpoint_metrics(
    State(state): State<AppState>,
) -> Json<ApiResponse<EndpointMetricsSnapshot>> {
    Json(ApiResponse::success(
        "Endpoint metrics",
        state.metrics.snapshot(),
    ))
}
