//! HTTP request handlers.

pub mod health;
pub mod landing;
pub mod metrics;
pub mod render;

use crate::error::ApiError;

/// Fallback for known paths hit with an unsupported method.
pub async fn method_not_allowed_handler() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Fallback for unknown paths.
pub async fn not_found_handler() -> ApiError {
    ApiError::RouteNotFound
}
