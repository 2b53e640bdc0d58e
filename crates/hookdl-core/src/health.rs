//! Health check: re-verify every file listed in an installation's record.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::env::{environment_dir, ENVIRONMENT_DIR};
use crate::integrity::{VerifyError, DEFAULT_CHUNK_SIZE};
use crate::record::{self, RecordError};

/// Appended to every mismatch report.
pub const REINSTALL_HINT: &str = "Please reinstall the download environment";

#[derive(Debug, Error)]
pub enum HealthError {
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error("failed to read installed file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Check the installation in `dir`.
///
/// `Ok(None)` when every recorded file still matches its digest. On the first
/// mismatch, returns a human-readable report naming the file, both digests and
/// the remedy; later entries are not checked. A missing record or a missing
/// recorded file is an error, not a report.
pub fn check(dir: &Path) -> Result<Option<String>, HealthError> {
    check_with_chunk_size(dir, DEFAULT_CHUNK_SIZE)
}

pub fn check_with_chunk_size(dir: &Path, chunk_size: usize) -> Result<Option<String>, HealthError> {
    for entry in record::read(dir)? {
        let entry = entry?;
        let path = dir.join(&entry.filename);
        let file = File::open(&path).map_err(|source| HealthError::Io {
            path: path.clone(),
            source,
        })?;
        for chunk in entry.integrity.verify_with_chunk_size(file, chunk_size) {
            match chunk {
                Ok(_) => {}
                Err(VerifyError::Mismatch(m)) => {
                    tracing::warn!("{} failed verification: {}", path.display(), m.actual());
                    return Ok(Some(format!("{} {}{}", entry.filename, m, REINSTALL_HINT)));
                }
                Err(VerifyError::Io(source) | VerifyError::Write(source)) => {
                    return Err(HealthError::Io { path, source })
                }
            }
        }
        tracing::debug!("{} verified", path.display());
    }
    Ok(None)
}

/// Check the installation for `version` under `root`.
pub fn health_check(root: &Path, version: &str) -> Result<Option<String>, HealthError> {
    check(&environment_dir(root, ENVIRONMENT_DIR, version))
}
