//! Runner configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Wall-clock limit for a single render.
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(120);

/// Wall-clock limit for the `--version` availability probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

pub const DEFAULT_BLENDER_BIN: &str = "blender";
pub const DEFAULT_RENDER_SCRIPT: &str = "/app/render_part.py";
pub const DEFAULT_LIBRARY_ROOT: &str = "/usr/share/ldraw/ldraw";

/// Where the renderer lives and how long it may run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Blender executable, resolved through `PATH` when not absolute
    pub blender_bin: PathBuf,
    /// Python script Blender runs to produce the SVG
    pub render_script: PathBuf,
    /// LDraw library root handed to the script for sub-file lookup
    pub library_root: PathBuf,
    /// Directory for scratch output files
    pub scratch_dir: PathBuf,
    pub render_timeout: Duration,
    pub probe_timeout: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            blender_bin: PathBuf::from(DEFAULT_BLENDER_BIN),
            render_script: PathBuf::from(DEFAULT_RENDER_SCRIPT),
            library_root: PathBuf::from(DEFAULT_LIBRARY_ROOT),
            scratch_dir: std::env::temp_dir(),
            render_timeout: DEFAULT_RENDER_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}
