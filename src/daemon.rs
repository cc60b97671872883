//! Process support for the long-running gateway: PID file and shutdown signals

use anyhow::{Context, Result};
use signal_hook::consts::signal::{SIGINT, SIGQUIT, SIGTERM};
use signal_hook_tokio::Signals;
use std::fs;
use std::path::{Path, PathBuf};
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

/// PID file removed again when dropped
pub struct PidFile {
    path: PathBuf,
    pid: u32,
}

impl PidFile {
    /// Write the current PID to `path`, replacing a stale file left by a dead process
    pub fn create(path: &Path) -> Result<Self> {
        let pid = std::process::id();

        if path.exists() {
            let existing = fs::read_to_string(path)
                .context("Failed to read existing PID file")?
                .trim()
                .parse::<u32>()
                .ok();

            match existing {
                Some(other) if other != pid && process_exists(other) => {
                    anyhow::bail!(
                        "Gateway already running with PID {} (PID file {})",
                        other,
                        path.display()
                    );
                }
                _ => {
                    info!("Replacing stale PID file {}", path.display());
                    fs::remove_file(path)?;
                }
            }
        }

        fs::write(path, pid.to_string())
            .with_context(|| format!("Failed to write PID file {}", path.display()))?;
        debug!("Wrote PID {} to {}", pid, path.display());

        Ok(Self {
            path: path.to_path_buf(),
            pid,
        })
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!("Failed to remove PID file {}: {}", self.path.display(), e);
        }
    }
}

fn process_exists(pid: u32) -> bool {
    #[cfg(unix)]
    {
        use nix::sys::signal::kill;
        use nix::unistd::Pid;

        // Signal 0 only checks that the target exists
        kill(Pid::from_raw(pid as i32), None).is_ok()
    }

    #[cfg(not(unix))]
    {
        let _ = pid;
        true
    }
}

/// Resolves on the first SIGINT, SIGTERM or SIGQUIT
pub async fn shutdown_signal() -> Result<impl std::future::Future<Output = ()>> {
    let signals =
        Signals::new([SIGTERM, SIGINT, SIGQUIT]).context("Failed to register signal handlers")?;
    let handle = signals.handle();

    Ok(async move {
        let mut signals = signals;
        if let Some(signal) = signals.next().await {
            info!("Received signal {}, shutting down", signal);
        }
        handle.close();
    })
}
