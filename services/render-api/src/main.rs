//! Part Render API Server
//!
//! Renders LDraw parts to SVG line drawings by driving Blender.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use render_api::health::check_health;
use render_api::{serve, AppState, Args};

fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = match runtime_builder.build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to create Tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run_server(args)) {
        error!(error = %e, "Render API exited with error");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server(args: Args) -> Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    info!("Starting Render API server");

    let config = args.into_config()?;
    info!(
        listen = %config.listen_addr,
        blender = %config.runner.blender_bin.display(),
        script = %config.runner.render_script.display(),
        ldraw = %config.runner.library_root.display(),
        scratch = %config.runner.scratch_dir.display(),
        render_timeout_secs = config.runner.render_timeout.as_secs(),
        "Configuration loaded"
    );

    let prometheus = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    let addr = config.listen_addr;
    let state = Arc::new(AppState::new(config).with_prometheus(prometheus));

    // Startup checks are advisory; /health reports the live state
    let report = check_health(&state.runner, &state.library).await;
    if report.is_healthy() {
        info!("Renderer, library and scratch directory available");
    } else {
        warn!(
            renderer_available = report.renderer_available,
            assets_available = report.assets_available,
            scratch_writable = report.scratch_writable,
            "Starting with unavailable dependencies"
        );
    }

    serve(state, addr).await
}
