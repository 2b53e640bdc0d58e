//! Opening resource locators as byte streams.
//!
//! The installer only depends on [`Fetch`]; [`CurlFetcher`] is the default
//! implementation. One attempt per open, no retries.

mod transfer;

use std::io::{self, Read};
use thiserror::Error;

use crate::locator::Locator;

pub use transfer::{BodyReader, CurlFetcher};

#[derive(Debug, Error)]
#[error("failed to fetch {url}: {source}")]
pub struct FetchError {
    pub url: String,
    #[source]
    pub source: io::Error,
}

impl FetchError {
    pub fn new(locator: &Locator, source: io::Error) -> Self {
        Self {
            url: locator.to_string(),
            source,
        }
    }
}

/// Opens a locator as a readable byte stream.
pub trait Fetch {
    type Reader: Read;

    fn open(&self, locator: &Locator) -> Result<Self::Reader, FetchError>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    type Reader = F::Reader;

    fn open(&self, locator: &Locator) -> Result<Self::Reader, FetchError> {
        (**self).open(locator)
    }
}
