//! Landing page handler.

use std::collections::BTreeMap;

use axum::Json;
use serde::{Deserialize, Serialize};

pub const SERVICE_NAME: &str = "LEGO Part Renderer";

/// Service name, version and endpoint map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub service: String,
    pub version: String,
    pub endpoints: BTreeMap<String, String>,
}

impl ServiceDescriptor {
    pub fn current() -> Self {
        let endpoints = [
            ("GET /", "Service description"),
            ("POST /render", "Render a part to SVG"),
            ("GET /health", "Renderer, library and scratch checks"),
            ("GET /metrics", "Render counters as JSON"),
            ("GET /metrics/prometheus", "Render counters in Prometheus format"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            service: SERVICE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            endpoints,
        }
    }
}

/// GET / - service descriptor
pub async fn landing_handler() -> Json<ServiceDescriptor> {
    Json(ServiceDescriptor::current())
}
