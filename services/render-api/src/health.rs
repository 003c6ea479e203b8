//! Dependency checks behind the health endpoint.

use serde::{Deserialize, Serialize};
use tracing::debug;

use blender_runner::BlenderRunner;
use ldraw_library::PartLibrary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Result of one round of dependency checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: HealthStatus,
    pub renderer_available: bool,
    pub assets_available: bool,
    pub scratch_writable: bool,
}

impl HealthReport {
    pub fn from_checks(renderer_available: bool, assets_available: bool, scratch_writable: bool) -> Self {
        let status = if renderer_available && assets_available && scratch_writable {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        };
        Self {
            status,
            renderer_available,
            assets_available,
            scratch_writable,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

/// Run the renderer probe, library check and scratch check concurrently.
///
/// A check that cannot complete counts as failed.
pub async fn check_health(runner: &BlenderRunner, library: &PartLibrary) -> HealthReport {
    let scratch = runner.scratch().clone();
    let scratch_check = async move {
        tokio::task::spawn_blocking(move || scratch.is_writable())
            .await
            .unwrap_or(false)
    };

    let (renderer, assets, scratch) =
        tokio::join!(runner.probe(), library.is_available(), scratch_check);
    debug!(renderer, assets, scratch, "Health checks complete");

    HealthReport::from_checks(renderer, assets, scratch)
}
