//! Supervised execution of the external Blender renderer.
//!
//! Each render gets a private scratch file, a Blender process running the
//! line-art script in background mode, and a hard deadline. The outcome is
//! either the SVG bytes the script wrote or a [`RunError`] saying which stage
//! failed.

pub mod config;
pub mod error;
pub mod invocation;
pub mod runner;
pub mod scratch;

pub use config::RunnerConfig;
pub use error::RunError;
pub use invocation::RenderInvocation;
pub use runner::{BlenderRunner, RenderOutput};
pub use scratch::ScratchSpace;
