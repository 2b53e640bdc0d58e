//! Verified per-platform artifact provisioning.
//!
//! A hook declares one manifest entry per supported platform. [`install`]
//! picks the entry for the running host, streams it through an integrity
//! check into an installation directory and records its digest;
//! [`health`] re-verifies that record later.

pub mod config;
pub mod env;
pub mod fetch;
pub mod health;
pub mod install;
pub mod integrity;
pub mod locator;
pub mod logging;
pub mod manifest;
pub mod platform;
pub mod record;

pub use health::{health_check, HealthError};
pub use install::{install, InstallError, Installed, Installer};
pub use integrity::{Algorithm, Integrity};
pub use manifest::ManifestEntry;
pub use platform::Platform;
