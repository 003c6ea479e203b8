//! Scratch files used to hand rendered output back from the renderer.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempPath;

/// A directory where per-render scratch files are created.
#[derive(Debug, Clone)]
pub struct ScratchSpace {
    dir: PathBuf,
}

impl ScratchSpace {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create an empty, uniquely named file. It is removed when the returned
    /// path is dropped.
    pub fn allocate(&self, prefix: &str, suffix: &str) -> io::Result<TempPath> {
        let file = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempfile_in(&self.dir)?;
        Ok(file.into_temp_path())
    }

    /// True when a file can be created and removed again.
    pub fn is_writable(&self) -> bool {
        self.allocate("healthcheck-", "")
            .and_then(|path| path.close())
            .is_ok()
    }
}
