//! Render outcome counters.
//!
//! Totals live behind a single lock so a snapshot never shows a render count
//! and a duration sum from different moments. Each update is mirrored to the
//! `metrics` facade for the Prometheus exporter.

use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

#[derive(Debug, Default, Clone, Copy)]
struct RenderTotals {
    renders_total: u64,
    errors: u64,
    duration_sum_secs: f64,
}

/// Process-wide render counters.
#[derive(Debug)]
pub struct RenderMetrics {
    totals: RwLock<RenderTotals>,
    start_time: Instant,
}

/// Point-in-time view of [`RenderMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Successful renders
    pub renders_total: u64,
    /// Failed render attempts
    pub errors: u64,
    /// Mean duration of successful renders, 0 before the first one
    pub avg_render_duration_seconds: f64,
    pub render_duration_sum_seconds: f64,
    pub uptime_seconds: u64,
}

impl RenderMetrics {
    pub fn new() -> Self {
        Self {
            totals: RwLock::new(RenderTotals::default()),
            start_time: Instant::now(),
        }
    }

    /// Record a render that produced an image.
    pub async fn record_success(&self, duration: Duration) {
        let secs = duration.as_secs_f64();
        {
            let mut totals = self.totals.write().await;
            totals.renders_total += 1;
            totals.duration_sum_secs += secs;
        }
        counter!("renders_total").increment(1);
        histogram!("render_duration_seconds").record(secs);
    }

    /// Record a render attempt that failed.
    pub async fn record_error(&self) {
        self.totals.write().await.errors += 1;
        counter!("render_errors_total").increment(1);
    }

    pub async fn snapshot(&self) -> MetricsSnapshot {
        let totals = *self.totals.read().await;
        let avg = if totals.renders_total == 0 {
            0.0
        } else {
            totals.duration_sum_secs / totals.renders_total as f64
        };

        MetricsSnapshot {
            renders_total: totals.renders_total,
            errors: totals.errors,
            avg_render_duration_seconds: avg,
            render_duration_sum_seconds: totals.duration_sum_secs,
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for RenderMetrics {
    fn default() -> Self {
        Self::new()
    }
}
