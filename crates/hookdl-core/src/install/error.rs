//! Error type for installs.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::fetch::FetchError;
use crate::integrity::ChecksumMismatch;
use crate::manifest::ManifestError;
use crate::platform::{Platform, PlatformError};

#[derive(Debug, Error)]
pub enum InstallError {
    /// The host itself is not a recognized platform.
    #[error(transparent)]
    Host(#[from] PlatformError),
    #[error("invalid manifest entry #{index}: {source}")]
    InvalidEntry {
        index: usize,
        #[source]
        source: ManifestError,
    },
    /// No entry declares the host platform. Lists every candidate so the
    /// message alone is enough to diagnose a missing or mistyped entry.
    #[error("failed to find platform `{host}` in manifest entries: {candidates:?}")]
    NoMatchingPlatform {
        host: Platform,
        candidates: Vec<String>,
    },
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Checksum(#[from] ChecksumMismatch),
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl InstallError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| InstallError::Io { path, source }
    }

    /// The integrity failure, if this install failed verification.
    pub fn checksum_mismatch(&self) -> Option<&ChecksumMismatch> {
        match self {
            InstallError::Checksum(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_checksum_mismatch(&self) -> bool {
        self.checksum_mismatch().is_some()
    }
}
