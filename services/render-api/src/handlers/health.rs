//! Health handler.

use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, Json};
use tracing::{instrument, warn};

use crate::health::{check_health, HealthReport};
use crate::state::AppState;

/// GET /health - renderer, library and scratch checks
#[instrument(skip(state))]
pub async fn health_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> (StatusCode, Json<HealthReport>) {
    let report = check_health(&state.runner, &state.library).await;

    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        warn!(
            renderer_available = report.renderer_available,
            assets_available = report.assets_available,
            scratch_writable = report.scratch_writable,
            "Health check failed"
        );
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(report))
}
