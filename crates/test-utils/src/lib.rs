//! Shared test utilities for the part renderer workspace.
//!
//! This crate provides common testing infrastructure including:
//! - A throwaway LDraw library tree
//! - Fake renderer executables with scripted behavior
//! - Skip macros for tests that need a real Blender install
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{FakeRenderer, LibraryFixture};
//! ```

pub mod fixtures;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use paths::*;

/// Macro to skip a test if an executable is not on `PATH`.
///
/// Rendering against the real engine is only possible on hosts that have
/// Blender installed; everywhere else those tests print a skip message.
///
/// # Usage
///
/// ```ignore
/// use test_utils::require_executable;
///
/// #[tokio::test]
/// async fn test_real_render() {
///     let blender = require_executable!("blender");
///     // Test code using blender...
/// }
/// ```
#[macro_export]
macro_rules! require_executable {
    ($name:expr) => {{
        match $crate::find_executable($name) {
            Some(path) => path,
            None => {
                eprintln!("SKIPPED: executable '{}' not found on PATH.", $name);
                return;
            }
        }
    }};
}

/// Macro to skip a test unless an environment variable is set.
///
/// Evaluates to the variable's value.
#[macro_export]
macro_rules! require_env {
    ($name:expr) => {{
        match std::env::var($name) {
            Ok(value) if !value.is_empty() => value,
            _ => {
                eprintln!("SKIPPED: environment variable '{}' not set.", $name);
                return;
            }
        }
    }};
}

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}
