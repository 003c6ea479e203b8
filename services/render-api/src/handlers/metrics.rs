//! Metrics handlers.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ApiError;
use crate::metrics::MetricsSnapshot;
use crate::state::AppState;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// GET /metrics - render counters as JSON
pub async fn metrics_handler(Extension(state): Extension<Arc<AppState>>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot().await)
}

/// GET /metrics/prometheus - exporter text format
pub async fn prometheus_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let handle = state.prometheus.as_ref().ok_or(ApiError::RouteNotFound)?;
    Ok((
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        handle.render(),
    )
        .into_response())
}
