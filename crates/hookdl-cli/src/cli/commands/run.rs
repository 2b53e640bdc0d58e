//! `hookdl run` – run a program inside an installation's environment.

use anyhow::{Context, Result};
use hookdl_core::env::{self, environment_dir, ENVIRONMENT_DIR};
use std::path::Path;

/// Returns the child's exit code (1 if it was killed by a signal).
pub fn run_program(root: &Path, version: &str, program: &str, args: &[String]) -> Result<i32> {
    let dir = environment_dir(root, ENVIRONMENT_DIR, version);
    let status = env::command(&dir, program)?
        .args(args)
        .status()
        .with_context(|| format!("failed to run {}", program))?;
    tracing::debug!("{} exited with {}", program, status);
    Ok(status.code().unwrap_or(1))
}
