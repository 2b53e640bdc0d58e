//! Chunked verify-while-streaming transform.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::io::{ErrorKind, Read};
use std::iter::FusedIterator;

use super::algorithm::Hasher;
use super::error::{ChecksumMismatch, VerifyError};

/// Single-pass iterator over the chunks of a byte source.
///
/// Each chunk is hashed and handed back unchanged, so callers can write it
/// wherever they like without buffering the whole source. Once the source is
/// exhausted the digest is compared with the expected one and, on mismatch,
/// one final [`VerifyError::Mismatch`] is yielded. Nothing is reported before
/// the whole source has been consumed.
pub struct Verify<R> {
    reader: R,
    hasher: Option<Hasher>,
    expected: String,
    buf: Vec<u8>,
}

impl<R: Read> Verify<R> {
    pub(crate) fn new(reader: R, hasher: Hasher, expected: String, chunk_size: usize) -> Self {
        Self {
            reader,
            hasher: Some(hasher),
            expected,
            buf: vec![0u8; chunk_size.max(1)],
        }
    }
}

impl<R: Read> Iterator for Verify<R> {
    type Item = Result<Vec<u8>, VerifyError>;

    fn next(&mut self) -> Option<Self::Item> {
        let hasher = self.hasher.as_mut()?;
        loop {
            match self.reader.read(&mut self.buf) {
                Ok(0) => break,
                Ok(n) => {
                    hasher.update(&self.buf[..n]);
                    return Some(Ok(self.buf[..n].to_vec()));
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.hasher = None;
                    return Some(Err(e.into()));
                }
            }
        }

        let actual = BASE64.encode(self.hasher.take()?.finalize());
        if actual == self.expected {
            None
        } else {
            Some(Err(ChecksumMismatch::new(self.expected.clone(), actual).into()))
        }
    }
}

impl<R: Read> FusedIterator for Verify<R> {}

impl<R> std::fmt::Debug for Verify<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Verify")
            .field("expected", &self.expected)
            .field("chunk_size", &self.buf.len())
            .field("finished", &self.hasher.is_none())
            .finish()
    }
}
