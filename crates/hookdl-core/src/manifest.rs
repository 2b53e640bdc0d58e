//! Per-platform artifact declarations.
//!
//! Each manifest entry is exactly four lines:
//!
//! ```text
//! linux/amd64
//! sha256-oRJkj6Cr8nWIivZ9d3W+rVZt/aSW1l9YtxSVh+GtIHM=
//! https://example.com/releases/tool-linux-amd64
//! tool
//! ```

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

use crate::integrity::{Integrity, IntegrityError};
use crate::locator::{Locator, LocatorError};
use crate::platform::{Platform, PlatformError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    #[error("manifest entry must have 4 lines (platform, integrity, URI, filename), found {found}")]
    LineCount { found: usize },
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    Integrity(#[from] IntegrityError),
    #[error(transparent)]
    Locator(#[from] LocatorError),
    #[error("invalid filename `{0}`, expected a single relative path segment")]
    Filename(String),
}

/// One platform's artifact: where to get it, what it must hash to, and its installed name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub platform: Platform,
    pub integrity: Integrity,
    pub locator: Locator,
    pub filename: PathBuf,
}

impl ManifestEntry {
    pub fn parse(raw: &str) -> Result<Self, ManifestError> {
        let [platform, integrity, locator, filename] = split_fields(raw)?;
        Ok(Self {
            platform: platform.parse()?,
            integrity: integrity.parse()?,
            locator: locator.parse()?,
            filename: parse_filename(filename)?,
        })
    }
}

/// Parse only the platform line of an entry, checking nothing but the line count besides.
///
/// Lets a caller skip entries for other platforms without validating fields
/// it will never use.
pub fn entry_platform(raw: &str) -> Result<Platform, ManifestError> {
    let [platform, ..] = split_fields(raw)?;
    Ok(platform.parse()?)
}

fn split_fields(raw: &str) -> Result<[&str; 4], ManifestError> {
    let lines: Vec<&str> = raw.lines().collect();
    match lines.as_slice() {
        &[platform, integrity, locator, filename] => Ok([platform, integrity, locator, filename]),
        _ => Err(ManifestError::LineCount { found: lines.len() }),
    }
}

pub(crate) fn parse_filename(raw: &str) -> Result<PathBuf, ManifestError> {
    let mut components = Path::new(raw).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) => Ok(PathBuf::from(name)),
        _ => Err(ManifestError::Filename(raw.to_string())),
    }
}

/// Split manifest text into entries separated by one or more blank lines.
pub fn split_entries(text: &str) -> Vec<String> {
    let mut entries = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                entries.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        entries.push(current.join("\n"));
    }
    entries
}
