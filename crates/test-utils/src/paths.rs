//! Path utilities for tests.

use std::path::PathBuf;

/// Looks up an executable on `PATH`.
///
/// # Returns
///
/// `Some(PathBuf)` for the first matching regular file, `None` otherwise.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Creates a temporary directory with a specific prefix.
///
/// # Arguments
///
/// * `prefix` - A prefix for the directory name (e.g., "ldraw_")
///
/// # Returns
///
/// A `tempfile::TempDir` with the specified prefix, removed on drop.
pub fn temp_test_dir_with_prefix(prefix: &str) -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("Failed to create temporary test directory")
}
