//! Error types for integrity descriptors and verification.

use std::io;
use thiserror::Error;

/// Malformed integrity descriptor. Raised before any I/O happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("invalid integrity string `{0}`, expected `<algorithm>-<base64 digest>`")]
    MissingSeparator(String),
    #[error("`{algorithm}` is not available, choose one of: {}", .available.join(","))]
    UnsupportedAlgorithm {
        algorithm: String,
        available: Vec<String>,
    },
    #[error("invalid checksum string, the checksum has to be encoded in base64")]
    InvalidBase64,
    #[error("invalid checksum length of {actual} for {algorithm}, expected {expected}")]
    InvalidLength {
        algorithm: String,
        actual: usize,
        expected: usize,
    },
}

/// The bytes read did not hash to the expected digest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("checksum mismatch:\n - expected: {expected}\n - actual  : {actual}\n")]
pub struct ChecksumMismatch {
    expected: String,
    actual: String,
}

impl ChecksumMismatch {
    pub fn new(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Base64 digest the descriptor declared.
    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// Base64 digest of the bytes actually read.
    pub fn actual(&self) -> &str {
        &self.actual
    }
}

/// Failure while streaming through a verifier.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Reading the source failed.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Writing to the destination of [`verify_copy`](super::Integrity::verify_copy) failed.
    #[error("failed to write verified output: {0}")]
    Write(#[source] io::Error),
    #[error(transparent)]
    Mismatch(#[from] ChecksumMismatch),
}

impl VerifyError {
    pub fn mismatch(&self) -> Option<&ChecksumMismatch> {
        match self {
            VerifyError::Mismatch(m) => Some(m),
            VerifyError::Io(_) | VerifyError::Write(_) => None,
        }
    }
}
