//! Installation directories and the environment used to run what is installed in them.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Category label for directories holding downloaded artifacts.
pub const ENVIRONMENT_DIR: &str = "download";

/// Version used when a hook does not pin one.
pub const DEFAULT_VERSION: &str = "default";

/// Deterministic directory for a (root, category, version) triple: `<root>/<category>-<version>`.
pub fn environment_dir(root: &Path, category: &str, version: &str) -> PathBuf {
    root.join(format!("{category}-{version}"))
}

/// `PATH` value with `dir` prepended to the current one.
pub fn path_patch(dir: &Path) -> Result<OsString, std::env::JoinPathsError> {
    let mut paths = vec![dir.to_path_buf()];
    if let Some(current) = std::env::var_os("PATH") {
        paths.extend(std::env::split_paths(&current));
    }
    std::env::join_paths(paths)
}

/// A command for `program` with the environment of `dir` applied.
pub fn command(dir: &Path, program: &str) -> Result<Command, std::env::JoinPathsError> {
    let mut cmd = Command::new(program);
    cmd.env("PATH", path_patch(dir)?);
    Ok(cmd)
}
