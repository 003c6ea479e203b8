//! Render API library.
//!
//! HTTP front end for the Blender line-art renderer: request validation,
//! part lookup, supervised rendering, and the health and metrics endpoints.

pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod metrics;
pub mod server;
pub mod state;

pub use config::{Args, ServiceConfig};
pub use error::{ApiError, ErrorResponse};
pub use server::{build_router, serve};
pub use state::AppState;
