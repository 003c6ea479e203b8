//! Render handler.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::Extension,
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use blender_runner::RenderOutput;
use part_common::{parse_render_request, RenderParams};

use crate::error::ApiError;
use crate::state::AppState;

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// Rendered output for a given parameter set never changes.
pub const IMMUTABLE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

pub const RENDER_DURATION_HEADER: HeaderName = HeaderName::from_static("x-render-duration");

/// POST /render - render one part to SVG
///
/// Takes the raw body; decode failures are reported as `Invalid JSON`.
#[instrument(skip(state, body), fields(render_id = %Uuid::new_v4()))]
pub async fn render_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request_start = Instant::now();

    let params = parse_render_request(&body).map_err(|e| {
        warn!(error = %e, "Rejected render request");
        ApiError::from(e)
    })?;

    match render_part(&state, &params).await {
        Ok(output) => {
            state.metrics.record_success(output.duration).await;
            info!(
                part = %params.part_number,
                bytes = output.bytes.len(),
                render_secs = output.duration.as_secs_f64(),
                total_ms = request_start.elapsed().as_millis() as u64,
                "Render complete"
            );
            Ok(svg_response(output))
        }
        Err(e) => {
            if e.counts_as_render_error() {
                state.metrics.record_error().await;
            }
            match &e {
                ApiError::PartNotFound(_) => info!(part = %params.part_number, "Part not found"),
                _ => error!(part = %params.part_number, error = %e, detail = ?e.detail(), "Render failed"),
            }
            Err(e)
        }
    }
}

async fn render_part(state: &AppState, params: &RenderParams) -> Result<RenderOutput, ApiError> {
    let Some(asset_path) = state.library.resolve(&params.part_number).await else {
        return Err(ApiError::PartNotFound(params.part_number.clone()));
    };

    info!(
        part = %params.part_number,
        asset = %asset_path.display(),
        thickness = params.thickness,
        fill_color = %params.fill_color,
        stroke_color = %params.stroke_color,
        camera_latitude = params.camera_latitude,
        camera_longitude = params.camera_longitude,
        resolution_x = params.resolution_x,
        resolution_y = params.resolution_y,
        padding = params.padding,
        crease_angle = params.crease_angle,
        edges = %params.edge_types,
        "Rendering part"
    );

    state
        .runner
        .render(&asset_path, params)
        .await
        .map_err(|source| ApiError::Render {
            part: params.part_number.clone(),
            source,
        })
}

fn svg_response(output: RenderOutput) -> Response {
    let duration = format!("{:.2}s", output.duration.as_secs_f64());
    let mut response = (StatusCode::OK, output.bytes).into_response();

    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(SVG_CONTENT_TYPE));
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(IMMUTABLE_CACHE_CONTROL),
    );
    if let Ok(value) = HeaderValue::from_str(&duration) {
        headers.insert(RENDER_DURATION_HEADER, value);
    }

    response
}
