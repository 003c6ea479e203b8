//! Application state shared by all handlers.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use blender_runner::BlenderRunner;
use ldraw_library::PartLibrary;

use crate::config::ServiceConfig;
use crate::metrics::RenderMetrics;

/// Shared application state.
pub struct AppState {
    pub config: ServiceConfig,

    /// Part lookup in the LDraw library.
    pub library: PartLibrary,

    /// Renderer process supervision.
    pub runner: BlenderRunner,

    pub metrics: Arc<RenderMetrics>,

    /// Present when the Prometheus recorder was installed at startup.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            library: PartLibrary::new(config.library_root()),
            runner: BlenderRunner::new(config.runner.clone()),
            metrics: Arc::new(RenderMetrics::new()),
            prometheus: None,
            config,
        }
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}
