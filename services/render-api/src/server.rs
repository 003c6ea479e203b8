//! HTTP server for the render service.
//!
//! Provides endpoints for:
//! - `GET /` - Service descriptor
//! - `POST /render` - Render a part to SVG
//! - `GET /health` - Renderer, library and scratch checks
//! - `GET /metrics` - Render counters as JSON
//! - `GET /metrics/prometheus` - Prometheus exporter output

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::handlers::{self, method_not_allowed_handler, not_found_handler};
use crate::state::AppState;

/// Build the router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::landing::landing_handler).fallback(method_not_allowed_handler),
        )
        .route(
            "/render",
            post(handlers::render::render_handler).fallback(method_not_allowed_handler),
        )
        .route(
            "/health",
            get(handlers::health::health_handler).fallback(method_not_allowed_handler),
        )
        .route(
            "/metrics",
            get(handlers::metrics::metrics_handler).fallback(method_not_allowed_handler),
        )
        .route(
            "/metrics/prometheus",
            get(handlers::metrics::prometheus_handler).fallback(method_not_allowed_handler),
        )
        .fallback(not_found_handler)
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}

/// Serve until SIGINT or SIGTERM. In-flight requests are allowed to finish.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(addr = %addr, "Render API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
