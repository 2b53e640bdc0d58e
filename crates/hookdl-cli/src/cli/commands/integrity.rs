//! `hookdl integrity` – compute the integrity string of a local file.

use anyhow::{Context, Result};
use hookdl_core::{Algorithm, Integrity};
use std::fs::File;
use std::path::Path;

/// Print `<algorithm>-<base64 digest>  <path>`, the same layout as a verification record line.
pub fn run_integrity(path: &Path, algorithm: Algorithm) -> Result<()> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let sri = Integrity::compute(algorithm, file)
        .with_context(|| format!("failed to read {}", path.display()))?;
    println!("{}  {}", sri, path.display());
    Ok(())
}
