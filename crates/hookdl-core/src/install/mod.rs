//! Installer: pick the host's manifest entry, download it through the
//! verifier, lock down its permissions, and record what was installed.
//!
//! A verification record is only written after the artifact verified, so a
//! failed install never leaves something the health checker would certify.
//! On mismatch the partially written artifact stays on disk.

mod error;

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use crate::config::HookdlConfig;
use crate::env::{environment_dir, ENVIRONMENT_DIR};
use crate::fetch::{CurlFetcher, Fetch, FetchError};
use crate::integrity::{VerifyError, DEFAULT_CHUNK_SIZE};
use crate::manifest::{self, ManifestEntry};
use crate::platform::Platform;
use crate::record::{self, RecordEntry};

pub use error::InstallError;

/// Permission bits of an installed artifact: owner read + execute, nothing else.
pub const ARTIFACT_MODE: u32 = 0o500;

/// Outcome of a successful install.
#[derive(Debug, Clone)]
pub struct Installed {
    pub entry: ManifestEntry,
    /// Absolute path of the installed artifact.
    pub path: PathBuf,
    pub bytes: u64,
}

/// Installs manifest entries for one host platform.
#[derive(Debug, Clone)]
pub struct Installer<F = CurlFetcher> {
    host: Platform,
    fetcher: F,
    chunk_size: usize,
}

impl Installer<CurlFetcher> {
    /// Installer for the running host with default fetch settings.
    pub fn for_host() -> Result<Self, InstallError> {
        Ok(Self::new(Platform::host()?, CurlFetcher::default()))
    }

    pub fn from_config(cfg: &HookdlConfig) -> Result<Self, InstallError> {
        Ok(Self::new(Platform::host()?, CurlFetcher::new(&cfg.fetch)).with_chunk_size(cfg.chunk_size()))
    }
}

impl<F: Fetch> Installer<F> {
    pub fn new(host: Platform, fetcher: F) -> Self {
        Self {
            host,
            fetcher,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn host(&self) -> Platform {
        self.host
    }

    /// The first entry, in list order, whose platform equals the host.
    ///
    /// Entries before the match are only checked for their line count and
    /// platform; the remaining fields are validated on the selected entry alone.
    pub fn select<S: AsRef<str>>(&self, entries: &[S]) -> Result<ManifestEntry, InstallError> {
        let invalid = |index: usize| {
            move |source: manifest::ManifestError| InstallError::InvalidEntry { index, source }
        };
        for (index, raw) in entries.iter().enumerate() {
            let raw = raw.as_ref();
            if manifest::entry_platform(raw).map_err(invalid(index))? == self.host {
                tracing::debug!("selected manifest entry #{} for {}", index, self.host);
                return ManifestEntry::parse(raw).map_err(invalid(index));
            }
        }
        Err(InstallError::NoMatchingPlatform {
            host: self.host,
            candidates: entries.iter().map(|e| e.as_ref().to_string()).collect(),
        })
    }

    /// Install the host's entry into `dir`.
    pub fn install<S: AsRef<str>>(
        &self,
        dir: &Path,
        entries: &[S],
    ) -> Result<Installed, InstallError> {
        let entry = self.select(entries)?;

        fs::create_dir_all(dir).map_err(InstallError::io(dir))?;
        record::remove(dir).map_err(InstallError::io(record::record_path(dir)))?;

        let dest = dir.join(&entry.filename);
        remove_existing(&dest).map_err(InstallError::io(&dest))?;

        let reader = self.fetcher.open(&entry.locator)?;
        let mut file = File::create(&dest).map_err(InstallError::io(&dest))?;
        let bytes = match entry
            .integrity
            .verify_copy(reader, &mut file, self.chunk_size)
        {
            Ok(n) => n,
            Err(VerifyError::Mismatch(m)) => {
                tracing::warn!(
                    "checksum mismatch for {} from {}: expected {}, got {}",
                    dest.display(),
                    entry.locator,
                    m.expected(),
                    m.actual()
                );
                return Err(m.into());
            }
            Err(VerifyError::Io(e)) => return Err(FetchError::new(&entry.locator, e).into()),
            Err(VerifyError::Write(e)) => return Err(InstallError::io(&dest)(e)),
        };
        drop(file);

        set_artifact_permissions(&dest).map_err(InstallError::io(&dest))?;

        let filename = entry.filename.to_string_lossy().into_owned();
        record::write(dir, &[RecordEntry::new(entry.integrity.clone(), filename)])
            .map_err(InstallError::io(record::record_path(dir)))?;

        tracing::info!(
            "installed {} ({} bytes, {}) into {}",
            entry.filename.display(),
            bytes,
            entry.integrity.algorithm(),
            dir.display()
        );
        Ok(Installed {
            entry,
            path: dest,
            bytes,
        })
    }
}

/// Install the host's entry into the environment directory for `version` under `root`.
pub fn install<S: AsRef<str>>(
    root: &Path,
    version: &str,
    entries: &[S],
) -> Result<Installed, InstallError> {
    let dir = environment_dir(root, ENVIRONMENT_DIR, version);
    Installer::for_host()?.install(&dir, entries)
}

/// A previous install leaves its artifact read-only; clear it before re-creating.
fn remove_existing(path: &Path) -> io::Result<()> {
    #[cfg(not(unix))]
    if let Ok(meta) = fs::metadata(path) {
        let mut perms = meta.permissions();
        if perms.readonly() {
            perms.set_readonly(false);
            fs::set_permissions(path, perms)?;
        }
    }
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

#[cfg(unix)]
fn set_artifact_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(ARTIFACT_MODE))
}

#[cfg(not(unix))]
fn set_artifact_permissions(path: &Path) -> io::Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_readonly(true);
    fs::set_permissions(path, perms)
}
