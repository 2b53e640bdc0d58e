//! Resource locators: where an artifact is fetched from.
//!
//! Validation is purely syntactic (scheme and host must be present);
//! reachability is left to the fetch step.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid URI: {0}")]
pub struct LocatorError(String);

/// A URI with both a scheme and a network host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator(String);

impl Locator {
    pub fn parse(raw: &str) -> Result<Self, LocatorError> {
        let url = Url::parse(raw).map_err(|_| LocatorError(raw.to_string()))?;
        match url.host_str() {
            Some(host) if !host.is_empty() => Ok(Self(raw.to_string())),
            _ => Err(LocatorError(raw.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Locator {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
