//! Renderer process supervision.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use bytes::Bytes;
use tokio::io::AsyncReadExt;
use tokio::process::{ChildStderr, Command};
use tokio::time::timeout;
use tracing::{debug, warn};

use part_common::RenderParams;

use crate::config::RunnerConfig;
use crate::error::RunError;
use crate::invocation::RenderInvocation;
use crate::scratch::ScratchSpace;

/// How long to keep draining stderr after the renderer has exited.
const STDERR_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// A successful render.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// SVG document written by the renderer
    pub bytes: Bytes,
    /// Time from process start to process exit
    pub duration: Duration,
}

/// Runs the Blender renderer for individual requests.
///
/// The runner holds no per-render state; concurrent calls each get their own
/// scratch file and child process.
#[derive(Debug, Clone)]
pub struct BlenderRunner {
    config: RunnerConfig,
    scratch: ScratchSpace,
}

impl BlenderRunner {
    pub fn new(config: RunnerConfig) -> Self {
        let scratch = ScratchSpace::new(config.scratch_dir.clone());
        Self { config, scratch }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn scratch(&self) -> &ScratchSpace {
        &self.scratch
    }

    /// Render `asset_path` with `params`.
    ///
    /// The scratch file is removed on every return path.
    pub async fn render(
        &self,
        asset_path: &Path,
        params: &RenderParams,
    ) -> Result<RenderOutput, RunError> {
        let output_path = self
            .scratch
            .allocate("render-", ".svg")
            .map_err(RunError::Scratch)?;

        let invocation = RenderInvocation {
            asset_path,
            output_path: &output_path,
            library_root: &self.config.library_root,
            params,
        };
        let args = invocation.command_args(&self.config.render_script);
        debug!(bin = %self.config.blender_bin.display(), args = ?args, "Spawning renderer");

        let mut command = Command::new(&self.config.blender_bin);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let started = Instant::now();
        let mut child = command.spawn().map_err(RunError::Process)?;
        let stderr_task = tokio::spawn(collect_stderr(child.stderr.take()));

        let status = match timeout(self.config.render_timeout, child.wait()).await {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => {
                stderr_task.abort();
                return Err(RunError::Process(e));
            }
            Err(_) => {
                if let Err(e) = child.kill().await {
                    warn!(pid = ?child.id(), error = %e, "Failed to kill timed out renderer");
                }
                stderr_task.abort();
                return Err(RunError::Timeout(self.config.render_timeout));
            }
        };
        let duration = started.elapsed();

        // a grandchild can keep the pipe open past the renderer's exit
        let stderr_abort = stderr_task.abort_handle();
        let stderr = match timeout(STDERR_DRAIN_TIMEOUT, stderr_task).await {
            Ok(Ok(text)) => text,
            Ok(Err(_)) => String::new(),
            Err(_) => {
                stderr_abort.abort();
                debug!("Gave up draining renderer stderr");
                String::new()
            }
        };

        if !status.success() {
            return Err(RunError::EngineFailed {
                status: status.to_string(),
                stderr,
            });
        }

        let bytes = tokio::fs::read(&output_path)
            .await
            .map_err(|e| RunError::OutputRead(e.to_string()))?;
        if bytes.is_empty() {
            return Err(RunError::OutputRead(
                "renderer produced an empty file".to_string(),
            ));
        }

        if let Err(e) = output_path.close() {
            warn!(error = %e, "Failed to remove scratch file");
        }

        Ok(RenderOutput {
            bytes: Bytes::from(bytes),
            duration,
        })
    }

    /// True when `<blender> --version` succeeds within the probe timeout.
    pub async fn probe(&self) -> bool {
        let mut command = Command::new(&self.config.blender_bin);
        command
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        match timeout(self.config.probe_timeout, command.status()).await {
            Ok(Ok(status)) => status.success(),
            Ok(Err(e)) => {
                debug!(error = %e, "Renderer probe failed to start");
                false
            }
            Err(_) => {
                debug!("Renderer probe timed out");
                false
            }
        }
    }
}

async fn collect_stderr(stderr: Option<ChildStderr>) -> String {
    let mut buf = Vec::new();
    if let Some(mut stderr) = stderr {
        if let Err(e) = stderr.read_to_end(&mut buf).await {
            debug!(error = %e, "Failed to read renderer stderr");
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
