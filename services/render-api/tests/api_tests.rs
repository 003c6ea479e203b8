//! End-to-end tests of the HTTP surface against fake renderers.
//!
//! Requests go through the full router with `tower::ServiceExt::oneshot`, so
//! routing, fallbacks and middleware are all exercised.

#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use bytes::Bytes;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use blender_runner::RunnerConfig;
use render_api::metrics::MetricsSnapshot;
use render_api::{build_router, AppState, ErrorResponse, ServiceConfig};
use test_utils::{temp_test_dir_with_prefix, FakeRenderer, LibraryFixture, FAKE_SVG};

struct TestService {
    router: Router,
    state: Arc<AppState>,
    renderer: Option<FakeRenderer>,
    _library: LibraryFixture,
    _scratch: TempDir,
}

struct Setup {
    renderer: Option<FakeRenderer>,
    library: LibraryFixture,
    scratch_subdir: Option<&'static str>,
    render_timeout: Duration,
}

impl Setup {
    fn new(renderer: FakeRenderer) -> Self {
        Self {
            renderer: Some(renderer),
            library: LibraryFixture::with_common_parts(),
            scratch_subdir: None,
            render_timeout: Duration::from_secs(10),
        }
    }

    fn start(self) -> TestService {
        let scratch = temp_test_dir_with_prefix("render_api_scratch_");
        let scratch_dir = match self.scratch_subdir {
            Some(sub) => scratch.path().join(sub),
            None => scratch.path().to_path_buf(),
        };
        let blender_bin = match &self.renderer {
            Some(renderer) => renderer.bin().to_path_buf(),
            None => PathBuf::from("/nonexistent/blender"),
        };

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".parse().unwrap(),
            runner: RunnerConfig {
                blender_bin,
                render_script: PathBuf::from("/app/render_part.py"),
                library_root: self.library.root().to_path_buf(),
                scratch_dir,
                render_timeout: self.render_timeout,
                probe_timeout: Duration::from_secs(5),
            },
        };
        let state = Arc::new(AppState::new(config));

        TestService {
            router: build_router(state.clone()),
            state,
            renderer: self.renderer,
            _library: self.library,
            _scratch: scratch,
        }
    }
}

impl TestService {
    async fn send(&self, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body)
    }

    async fn render(&self, body: Value) -> (StatusCode, HeaderMap, Bytes) {
        self.render_raw(body.to_string()).await
    }

    async fn render_raw(&self, body: impl Into<Body>) -> (StatusCode, HeaderMap, Bytes) {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/render")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap();
        self.send(request).await
    }

    async fn get(&self, uri: &str) -> (StatusCode, HeaderMap, Bytes) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    async fn metrics(&self) -> MetricsSnapshot {
        let (status, _, body) = self.get("/metrics").await;
        assert_eq!(status, StatusCode::OK);
        tokio_test::assert_ok!(serde_json::from_slice(&body))
    }

    fn recorded_args(&self) -> Vec<String> {
        self.renderer
            .as_ref()
            .map(FakeRenderer::recorded_args)
            .unwrap_or_default()
    }

    fn scratch_entries(&self) -> usize {
        std::fs::read_dir(self.state.runner.scratch().dir())
            .map(|dir| dir.count())
            .unwrap_or(0)
    }
}

fn error_body(body: &[u8]) -> ErrorResponse {
    tokio_test::assert_ok!(serde_json::from_slice(body))
}

// ============================================================================
// Successful renders
// ============================================================================

#[tokio::test]
async fn test_render_returns_svg() {
    let service = Setup::new(FakeRenderer::succeeding()).start();

    let (status, headers, body) = service
        .render(json!({"partNumber": "3001", "thickness": 2.0}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "image/svg+xml");
    assert_eq!(
        headers[header::CACHE_CONTROL],
        "public, max-age=31536000, immutable"
    );
    let duration = headers["x-render-duration"].to_str().unwrap();
    assert!(duration.ends_with('s'));
    assert!(duration.trim_end_matches('s').parse::<f64>().is_ok());
    assert_eq!(body.as_ref(), FAKE_SVG.as_bytes());

    let metrics = service.metrics().await;
    assert_eq!(metrics.renders_total, 1);
    assert_eq!(metrics.errors, 0);
    assert_eq!(service.scratch_entries(), 0);
}

#[tokio::test]
async fn test_parameters_reach_renderer() {
    let service = Setup::new(FakeRenderer::succeeding()).start();

    let (status, _, _) = service
        .render(json!({
            "partNumber": "3626bp01",
            "thickness": 4.5,
            "fillColor": "#ff0000",
            "strokeColor": "black",
            "cameraLatitude": -10,
            "cameraLongitude": 200,
            "resolutionX": 640,
            "resolutionY": 480,
            "padding": 0.1,
            "creaseAngle": 90,
            "edgeTypes": {"crease": false, "contour": true}
        }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let args = service.recorded_args();
    let positional = &args[4..];
    assert!(positional[0].ends_with("parts/3626bp01.dat"));
    assert_eq!(positional[3], "4.5");
    assert_eq!(positional[4], "#ff0000");
    assert_eq!(positional[5], "-10.000000");
    assert_eq!(positional[6], "200.000000");
    assert_eq!(positional[7], "640");
    assert_eq!(positional[8], "480");
    assert_eq!(positional[9], "0.100000");
    assert_eq!(positional[10], "90.000000");
    assert_eq!(positional[11], "silhouette,border,contour");
    assert_eq!(positional[12], "black");
}

#[tokio::test]
async fn test_alias_field_names_accepted() {
    let service = Setup::new(FakeRenderer::succeeding()).start();

    let (status, _, _) = service
        .render(json!({
            "partIdentifier": "3001",
            "lineThickness": 3.0,
            "resolutionWidth": 256,
            "resolutionHeight": 128
        }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let args = service.recorded_args();
    assert_eq!(args[4 + 3], "3.0");
    assert_eq!(args[4 + 7], "256");
    assert_eq!(args[4 + 8], "128");
}

#[tokio::test]
async fn test_primitive_lookup_renders() {
    let service = Setup::new(FakeRenderer::succeeding()).start();
    let (status, _, _) = service.render(json!({"partNumber": "4-4disc"})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(service.recorded_args()[4].ends_with("p/4-4disc.dat"));
}

// ============================================================================
// Client errors
// ============================================================================

#[tokio::test]
async fn test_unknown_part_is_404_and_counted() {
    let service = Setup::new(FakeRenderer::succeeding()).start();

    let (status, _, body) = service.render(json!({"partNumber": "INVALID99999"})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let error = error_body(&body);
    assert_eq!(error.error, "Part not found");
    assert_eq!(
        error.detail.as_deref(),
        Some("Part INVALID99999 not found in LDraw library")
    );

    let metrics = service.metrics().await;
    assert_eq!(metrics.renders_total, 0);
    assert_eq!(metrics.errors, 1);
    assert!(service.recorded_args().is_empty());
}

#[tokio::test]
async fn test_missing_part_number_is_400_and_not_counted() {
    let service = Setup::new(FakeRenderer::succeeding()).start();

    let (status, headers, body) = service.render(json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    assert_eq!(error_body(&body).error, "partNumber is required");

    let metrics = service.metrics().await;
    assert_eq!((metrics.renders_total, metrics.errors), (0, 0));
}

#[tokio::test]
async fn test_out_of_range_thickness_is_400() {
    let service = Setup::new(FakeRenderer::succeeding()).start();

    let (status, _, body) = service
        .render(json!({"partNumber": "3001", "thickness": 99}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_body(&body).error.contains("thickness"));
    assert!(service.recorded_args().is_empty());
    assert_eq!(service.metrics().await.errors, 0);
}

#[tokio::test]
async fn test_out_of_range_resolution_is_400() {
    let service = Setup::new(FakeRenderer::succeeding()).start();
    let (status, _, body) = service
        .render(json!({"partNumber": "3001", "resolutionX": 10}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_body(&body).error.contains("resolutionX"));
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let service = Setup::new(FakeRenderer::succeeding()).start();

    let (status, _, body) = service.render_raw("{\"partNumber\": ").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = error_body(&body);
    assert_eq!(error.error, "Invalid JSON");
    assert!(error.detail.is_some());
    assert_eq!(service.metrics().await.errors, 0);
}

#[tokio::test]
async fn test_non_object_bodies_are_invalid_json() {
    let service = Setup::new(FakeRenderer::succeeding()).start();

    for body in ["[]", r#"["3001"]"#, r#"["3001", 2.0]"#, "\"3001\""] {
        let (status, _, response) = service.render_raw(body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
        assert_eq!(error_body(&response).error, "Invalid JSON", "body {}", body);
    }

    assert!(service.recorded_args().is_empty());
    let metrics = service.metrics().await;
    assert_eq!((metrics.renders_total, metrics.errors), (0, 0));
}

#[tokio::test]
async fn test_path_escape_is_400() {
    let service = Setup::new(FakeRenderer::succeeding()).start();
    let (status, _, _) = service
        .render(json!({"partNumber": "../../etc/passwd"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(service.recorded_args().is_empty());
}

#[tokio::test]
async fn test_wrong_method_is_405() {
    let service = Setup::new(FakeRenderer::succeeding()).start();

    let (status, _, body) = service.get("/render").await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(error_body(&body).error, "Method not allowed");
    assert_eq!(service.metrics().await.errors, 0);
}

#[tokio::test]
async fn test_unknown_path_is_404() {
    let service = Setup::new(FakeRenderer::succeeding()).start();
    let (status, _, body) = service.get("/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_body(&body).error, "Not found");
}

// ============================================================================
// Render failures
// ============================================================================

#[tokio::test]
async fn test_engine_failure_is_500_with_stderr() {
    let service = Setup::new(FakeRenderer::failing("Error: Python script failed", 1)).start();

    let (status, _, body) = service.render(json!({"partNumber": "3001"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = error_body(&body);
    assert_eq!(error.error, "Rendering failed");
    assert_eq!(
        error.detail.as_deref().map(str::trim),
        Some("Error: Python script failed")
    );

    let metrics = service.metrics().await;
    assert_eq!((metrics.renders_total, metrics.errors), (0, 1));
    assert_eq!(service.scratch_entries(), 0);
}

#[tokio::test]
async fn test_timeout_is_500() {
    let mut setup = Setup::new(FakeRenderer::hanging(30));
    setup.render_timeout = Duration::from_millis(300);
    let service = setup.start();

    let (status, _, body) = service.render(json!({"partNumber": "3001"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = error_body(&body);
    assert_eq!(error.error, "Rendering timed out");
    assert_eq!(error.detail.as_deref(), Some("Part 3001"));
    assert_eq!(service.metrics().await.errors, 1);
    assert_eq!(service.scratch_entries(), 0);
}

#[tokio::test]
async fn test_missing_output_is_500() {
    let service = Setup::new(FakeRenderer::silent()).start();

    let (status, _, body) = service.render(json!({"partNumber": "3001"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_body(&body).error, "Failed to read output");
    assert_eq!(service.metrics().await.errors, 1);
}

#[tokio::test]
async fn test_unwritable_scratch_is_500() {
    let mut setup = Setup::new(FakeRenderer::succeeding());
    setup.scratch_subdir = Some("missing");
    let service = setup.start();

    let (status, _, body) = service.render(json!({"partNumber": "3001"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_body(&body).error, "Failed to create temp file");
    assert!(service.recorded_args().is_empty());
}

// ============================================================================
// Metrics
// ============================================================================

#[tokio::test]
async fn test_fresh_metrics_are_zero() {
    let service = Setup::new(FakeRenderer::succeeding()).start();
    let metrics = service.metrics().await;
    assert_eq!(metrics.renders_total, 0);
    assert_eq!(metrics.errors, 0);
    assert_eq!(metrics.avg_render_duration_seconds, 0.0);
}

#[tokio::test]
async fn test_average_matches_sum() {
    let service = Setup::new(FakeRenderer::succeeding()).start();
    for _ in 0..3 {
        let (status, _, _) = service.render(json!({"partNumber": "3001"})).await;
        assert_eq!(status, StatusCode::OK);
    }

    let metrics = service.metrics().await;
    assert_eq!(metrics.renders_total, 3);
    assert!(metrics.avg_render_duration_seconds > 0.0);
    test_utils::assert_approx_eq!(
        metrics.avg_render_duration_seconds,
        metrics.render_duration_sum_seconds / 3.0,
        1e-9
    );
}

#[tokio::test]
async fn test_concurrent_requests_are_all_counted() {
    let service = Arc::new(Setup::new(FakeRenderer::succeeding()).start());

    let mut tasks = Vec::new();
    for i in 0..12 {
        let service = service.clone();
        tasks.push(tokio::spawn(async move {
            let part = if i % 3 == 0 { "INVALID99999" } else { "3001" };
            service.render(json!({"partNumber": part})).await.0
        }));
    }

    let mut ok = 0;
    let mut not_found = 0;
    for task in tasks {
        match task.await.unwrap() {
            StatusCode::OK => ok += 1,
            StatusCode::NOT_FOUND => not_found += 1,
            other => panic!("unexpected status {}", other),
        }
    }
    assert_eq!((ok, not_found), (8, 4));

    let metrics = service.metrics().await;
    assert_eq!(metrics.renders_total, 8);
    assert_eq!(metrics.errors, 4);
    assert_eq!(service.scratch_entries(), 0);
}

#[tokio::test]
async fn test_prometheus_endpoint_absent_without_recorder() {
    let service = Setup::new(FakeRenderer::succeeding()).start();
    let (status, _, _) = service.get("/metrics/prometheus").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Health and landing
// ============================================================================

#[tokio::test]
async fn test_health_ok() {
    let service = Setup::new(FakeRenderer::succeeding()).start();

    let (status, _, body) = service.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    let report: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        report,
        json!({
            "status": "healthy",
            "rendererAvailable": true,
            "assetsAvailable": true,
            "scratchWritable": true,
        })
    );
}

#[tokio::test]
async fn test_health_reports_missing_library() {
    let mut setup = Setup::new(FakeRenderer::succeeding());
    setup.library = LibraryFixture::without_parts_dir();
    let service = setup.start();

    let (status, _, body) = service.get("/health").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let report: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(report["status"], "unhealthy");
    assert_eq!(report["assetsAvailable"], false);
    assert_eq!(report["rendererAvailable"], true);
}

#[tokio::test]
async fn test_health_reports_missing_renderer() {
    let mut setup = Setup::new(FakeRenderer::succeeding());
    setup.renderer = None;
    let service = setup.start();

    let (status, _, body) = service.get("/health").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let report: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(report["rendererAvailable"], false);
}

#[tokio::test]
async fn test_health_reports_unwritable_scratch() {
    let mut setup = Setup::new(FakeRenderer::succeeding());
    setup.scratch_subdir = Some("missing");
    let service = setup.start();

    let (status, _, body) = service.get("/health").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let report: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(report["scratchWritable"], false);
}

#[tokio::test]
async fn test_health_does_not_touch_metrics() {
    let service = Setup::new(FakeRenderer::succeeding()).start();
    service.get("/health").await;
    let metrics = service.metrics().await;
    assert_eq!((metrics.renders_total, metrics.errors), (0, 0));
}

#[tokio::test]
async fn test_landing_describes_service() {
    let service = Setup::new(FakeRenderer::succeeding()).start();

    let (status, _, body) = service.get("/").await;

    assert_eq!(status, StatusCode::OK);
    let descriptor: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(descriptor["service"], "LEGO Part Renderer");
    assert!(descriptor["endpoints"]["POST /render"].is_string());
}

// ============================================================================
// Real renderer
// ============================================================================

/// Renders against an installed Blender when `LDRAW_PATH` and
/// `RENDER_SCRIPT` point at a real library and script.
#[tokio::test]
async fn test_real_blender_render() {
    let blender = test_utils::require_executable!("blender");
    let ldraw = test_utils::require_env!("LDRAW_PATH");
    let script = test_utils::require_env!("RENDER_SCRIPT");

    let scratch = temp_test_dir_with_prefix("render_api_real_");
    let config = ServiceConfig {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        runner: RunnerConfig {
            blender_bin: blender,
            render_script: PathBuf::from(script),
            library_root: PathBuf::from(&ldraw),
            scratch_dir: scratch.path().to_path_buf(),
            ..RunnerConfig::default()
        },
    };
    assert!(Path::new(&ldraw).join("parts").is_dir());

    let router = build_router(Arc::new(AppState::new(config)));
    let request = Request::builder()
        .method(Method::POST)
        .uri("/render")
        .body(Body::from(
            json!({"partNumber": "3001", "resolutionX": 256, "resolutionY": 256}).to_string(),
        ))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&body).contains("<svg"));
}
