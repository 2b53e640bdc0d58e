//! Tracing setup for the `hookdl` binary.
//!
//! Install and health events go to `$XDG_STATE_HOME/hookdl/hookdl.log` so hook
//! output on the terminal stays clean. `HOOKDL_LOG` overrides the filter with
//! the usual `EnvFilter` directives.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "HOOKDL_LOG";

const DEFAULT_FILTER: &str = "info,hookdl=debug,hookdl_core=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Where [`init_logging`] appends.
pub fn log_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("hookdl")?;
    Ok(xdg_dirs.get_state_home().join("hookdl.log"))
}

/// Append-only file logging. Returns the log path.
///
/// Fails if the state dir cannot be created or the file opened, or if a
/// subscriber is already installed; callers fall back to [`init_logging_stderr`].
pub fn init_logging() -> Result<PathBuf> {
    let path = log_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log dir {}", parent.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;

    tracing::debug!("logging to {}", path.display());
    Ok(path)
}

pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
