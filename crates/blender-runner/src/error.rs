//! Error types for renderer execution.

use std::time::Duration;
use thiserror::Error;

/// Why a render did not produce an image.
#[derive(Debug, Error)]
pub enum RunError {
    /// The scratch output file could not be created
    #[error("failed to create scratch file: {0}")]
    Scratch(#[source] std::io::Error),

    /// The renderer could not be started or waited on
    #[error("failed to run renderer: {0}")]
    Process(#[source] std::io::Error),

    /// The deadline passed and the renderer was killed
    #[error("renderer timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// The renderer exited unsuccessfully. `stderr` is passed through untouched.
    #[error("renderer exited with {status}")]
    EngineFailed { status: String, stderr: String },

    /// The renderer exited cleanly but its output could not be read
    #[error("failed to read renderer output: {0}")]
    OutputRead(String),
}
