//! Command line and environment configuration.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use clap::Parser;

use blender_runner::config::{DEFAULT_BLENDER_BIN, DEFAULT_LIBRARY_ROOT, DEFAULT_RENDER_SCRIPT};
use blender_runner::RunnerConfig;

/// Part Render API Server
#[derive(Parser, Debug, Clone)]
#[command(name = "render-api")]
#[command(about = "HTTP service rendering LDraw parts to SVG line drawings with Blender")]
pub struct Args {
    /// Listen host
    #[arg(long, default_value = "0.0.0.0", env = "HOST")]
    pub host: String,

    /// Listen port
    #[arg(short, long, default_value_t = 8080, env = "PORT")]
    pub port: u16,

    /// Root of the LDraw parts library
    #[arg(long, default_value = DEFAULT_LIBRARY_ROOT, env = "LDRAW_PATH")]
    pub ldraw_path: PathBuf,

    /// Blender executable
    #[arg(long, default_value = DEFAULT_BLENDER_BIN, env = "BLENDER_BIN")]
    pub blender_bin: PathBuf,

    /// Line-art script run inside Blender
    #[arg(long, default_value = DEFAULT_RENDER_SCRIPT, env = "RENDER_SCRIPT")]
    pub render_script: PathBuf,

    /// Directory for scratch output files (defaults to the system temp dir)
    #[arg(long, env = "SCRATCH_DIR")]
    pub scratch_dir: Option<PathBuf>,

    /// Wall-clock limit for one render, in seconds
    #[arg(long, default_value_t = 120, env = "RENDER_TIMEOUT_SECS")]
    pub render_timeout_secs: u64,

    /// Wall-clock limit for the renderer availability probe, in seconds
    #[arg(long, default_value_t = 5, env = "PROBE_TIMEOUT_SECS")]
    pub probe_timeout_secs: u64,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,

    /// Number of worker threads
    #[arg(long, env = "TOKIO_WORKER_THREADS")]
    pub worker_threads: Option<usize>,
}

impl Args {
    /// Validate the raw arguments into a service configuration.
    pub fn into_config(self) -> Result<ServiceConfig> {
        let ip: IpAddr = self
            .host
            .parse()
            .with_context(|| format!("Invalid listen host: {}", self.host))?;
        ensure!(self.render_timeout_secs > 0, "render timeout must be positive");
        ensure!(self.probe_timeout_secs > 0, "probe timeout must be positive");

        Ok(ServiceConfig {
            listen_addr: SocketAddr::new(ip, self.port),
            runner: RunnerConfig {
                blender_bin: self.blender_bin,
                render_script: self.render_script,
                library_root: self.ldraw_path,
                scratch_dir: self.scratch_dir.unwrap_or_else(std::env::temp_dir),
                render_timeout: Duration::from_secs(self.render_timeout_secs),
                probe_timeout: Duration::from_secs(self.probe_timeout_secs),
            },
        })
    }
}

/// Resolved service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub listen_addr: SocketAddr,
    pub runner: RunnerConfig,
}

impl ServiceConfig {
    pub fn library_root(&self) -> &std::path::Path {
        &self.runner.library_root
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            runner: RunnerConfig::default(),
        }
    }
}
