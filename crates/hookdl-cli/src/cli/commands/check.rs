//! `hookdl check` – health-check an installation.

use anyhow::Result;
use hookdl_core::health_check;
use std::path::Path;

/// Prints the mismatch report and returns exit code 1 if the installation is unhealthy.
pub fn run_check(root: &Path, version: &str) -> Result<i32> {
    match health_check(root, version)? {
        None => {
            println!("healthy");
            Ok(0)
        }
        Some(report) => {
            println!("{}", report);
            Ok(1)
        }
    }
}
