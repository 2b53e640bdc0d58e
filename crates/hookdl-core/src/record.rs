//! Verification record: the sidecar file listing installed files and their digests.
//!
//! One line per file, `<algorithm>-<base64 digest>  <relative filename>`.
//! Written once per install and only read afterwards.

use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::integrity::{Integrity, IntegrityError};
use crate::manifest;

/// Fixed name of the record inside an installation directory.
pub const RECORD_FILE: &str = "health.srisum";

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to read verification record {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed verification record line {line}: `{content}`")]
    Malformed { line: usize, content: String },
    #[error("invalid integrity on verification record line {line}: {source}")]
    Integrity {
        line: usize,
        #[source]
        source: IntegrityError,
    },
}

/// One recorded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEntry {
    pub integrity: Integrity,
    pub filename: String,
}

impl RecordEntry {
    pub fn new(integrity: Integrity, filename: impl Into<String>) -> Self {
        Self {
            integrity,
            filename: filename.into(),
        }
    }

    /// Parse one line: split on the first space, surrounding whitespace trimmed.
    /// The filename must be a single path segment inside the installation directory.
    fn parse(line_no: usize, line: &str) -> Result<Self, RecordError> {
        let malformed = || RecordError::Malformed {
            line: line_no,
            content: line.to_string(),
        };
        let (sri, filename) = line.trim().split_once(' ').ok_or_else(malformed)?;
        let filename = filename.trim();
        if manifest::parse_filename(filename).is_err() {
            return Err(malformed());
        }
        let integrity = Integrity::parse(sri.trim()).map_err(|source| RecordError::Integrity {
            line: line_no,
            source,
        })?;
        Ok(Self::new(integrity, filename))
    }

    fn render(&self) -> String {
        format!("{}  {}\n", self.integrity, self.filename)
    }
}

pub fn record_path(dir: &Path) -> PathBuf {
    dir.join(RECORD_FILE)
}

/// Overwrite the record in `dir` with `entries`.
pub fn write(dir: &Path, entries: &[RecordEntry]) -> io::Result<()> {
    let body: String = entries.iter().map(RecordEntry::render).collect();
    fs::write(record_path(dir), body)
}

/// Remove a stale record, if any.
pub fn remove(dir: &Path) -> io::Result<()> {
    match fs::remove_file(record_path(dir)) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Lazily read the record in `dir`. Blank lines are skipped.
pub fn read(dir: &Path) -> Result<Entries, RecordError> {
    let path = record_path(dir);
    let file = fs::File::open(&path).map_err(|source| RecordError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(Entries {
        lines: BufReader::new(file).lines().enumerate(),
        path,
    })
}

/// Iterator over the entries of a record file.
#[derive(Debug)]
pub struct Entries {
    lines: std::iter::Enumerate<io::Lines<BufReader<fs::File>>>,
    path: PathBuf,
}

impl Iterator for Entries {
    type Item = Result<RecordEntry, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        for (idx, line) in self.lines.by_ref() {
            let line = match line {
                Ok(line) => line,
                Err(source) => {
                    return Some(Err(RecordError::Io {
                        path: self.path.clone(),
                        source,
                    }))
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            return Some(RecordEntry::parse(idx + 1, &line));
        }
        None
    }
}
