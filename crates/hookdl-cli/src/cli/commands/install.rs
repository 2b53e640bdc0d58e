//! `hookdl install` – install this host's entry from a manifest file.

use anyhow::{Context, Result};
use hookdl_core::config::HookdlConfig;
use hookdl_core::env::{environment_dir, ENVIRONMENT_DIR};
use hookdl_core::manifest::split_entries;
use hookdl_core::Installer;
use std::path::Path;

pub fn run_install(cfg: &HookdlConfig, root: &Path, version: &str, manifest: &Path) -> Result<()> {
    let text = std::fs::read_to_string(manifest)
        .with_context(|| format!("failed to read manifest {}", manifest.display()))?;
    let entries = split_entries(&text);
    anyhow::ensure!(!entries.is_empty(), "manifest {} has no entries", manifest.display());

    let dir = environment_dir(root, ENVIRONMENT_DIR, version);
    let installer = Installer::from_config(cfg)?;
    let installed = installer.install(&dir, &entries)?;
    println!(
        "installed {} ({} bytes) for {}",
        installed.path.display(),
        installed.bytes,
        installer.host()
    );
    Ok(())
}
