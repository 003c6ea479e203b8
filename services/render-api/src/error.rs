//! API error type and the JSON error envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use blender_runner::RunError;
use part_common::ParamError;

/// Body of every non-success response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Every way a request can fail.
#[derive(Debug, Error)]
pub enum ApiError {
    // === Client errors ===
    #[error(transparent)]
    Param(#[from] ParamError),

    #[error("Part {0} not found in LDraw library")]
    PartNotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Not found")]
    RouteNotFound,

    // === Render errors ===
    #[error("Render of part {part} failed: {source}")]
    Render {
        part: String,
        #[source]
        source: RunError,
    },
}

impl ApiError {
    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> StatusCode {
        match self {
            ApiError::Param(_) => StatusCode::BAD_REQUEST,
            ApiError::PartNotFound(_) | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Render { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the failure counts toward the render error total.
    ///
    /// Requests rejected before part lookup are not render attempts.
    pub fn counts_as_render_error(&self) -> bool {
        matches!(self, ApiError::PartNotFound(_) | ApiError::Render { .. })
    }

    /// Short, stable summary for the `error` field.
    pub fn message(&self) -> String {
        match self {
            ApiError::Param(ParamError::Malformed(_)) => "Invalid JSON".to_string(),
            ApiError::Param(e) => e.to_string(),
            ApiError::PartNotFound(_) => "Part not found".to_string(),
            ApiError::MethodNotAllowed => "Method not allowed".to_string(),
            ApiError::RouteNotFound => "Not found".to_string(),
            ApiError::Render { source, .. } => match source {
                RunError::Timeout(_) => "Rendering timed out",
                RunError::EngineFailed { .. } | RunError::Process(_) => "Rendering failed",
                RunError::OutputRead(_) => "Failed to read output",
                RunError::Scratch(_) => "Failed to create temp file",
            }
            .to_string(),
        }
    }

    /// Diagnostic text for the `detail` field, if any.
    pub fn detail(&self) -> Option<String> {
        match self {
            ApiError::Param(ParamError::Malformed(reason)) => Some(reason.clone()),
            ApiError::Param(_) | ApiError::MethodNotAllowed | ApiError::RouteNotFound => None,
            ApiError::PartNotFound(_) => Some(self.to_string()),
            ApiError::Render { part, source } => match source {
                RunError::Timeout(_) => Some(format!("Part {}", part)),
                // renderer stderr goes out untouched
                RunError::EngineFailed { stderr, status } => {
                    if stderr.trim().is_empty() {
                        Some(format!("Renderer exited with {}", status))
                    } else {
                        Some(stderr.clone())
                    }
                }
                RunError::Process(e) | RunError::Scratch(e) => Some(e.to_string()),
                RunError::OutputRead(reason) => Some(reason.clone()),
            },
        }
    }

    pub fn to_response_body(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.message(),
            detail: self.detail(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.http_status(), Json(self.to_response_body())).into_response()
    }
}
