//! SRI-style integrity descriptors (`<algorithm>-<base64 digest>`).
//!
//! Parsing validates everything that can be checked without I/O: the algorithm
//! must be supported and the digest must be canonical base64 of exactly the
//! algorithm's digest length, so truncated or padded checksums are caught
//! before anything is downloaded. Verification is a streaming transform, see
//! [`Verify`].

mod algorithm;
mod error;
mod verify;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::fmt;
use std::io::{self, Read, Write};
use std::str::FromStr;

pub use algorithm::{Algorithm, ALGORITHMS};
pub use error::{ChecksumMismatch, IntegrityError, VerifyError};
pub use verify::Verify;

/// Read size used when streaming through a verifier.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// A parsed integrity descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Integrity {
    algorithm: Algorithm,
    digest: String,
}

impl Integrity {
    /// Parse `<algorithm>-<base64 digest>`, splitting on the first `-`.
    pub fn parse(raw: &str) -> Result<Self, IntegrityError> {
        let (name, digest) = raw
            .split_once('-')
            .ok_or_else(|| IntegrityError::MissingSeparator(raw.to_string()))?;

        let algorithm =
            Algorithm::from_name(name).ok_or_else(|| IntegrityError::UnsupportedAlgorithm {
                algorithm: name.to_string(),
                available: Algorithm::names(),
            })?;

        let decoded = BASE64
            .decode(digest)
            .map_err(|_| IntegrityError::InvalidBase64)?;
        if BASE64.encode(&decoded) != digest {
            return Err(IntegrityError::InvalidBase64);
        }

        if decoded.len() != algorithm.digest_len() {
            return Err(IntegrityError::InvalidLength {
                algorithm: algorithm.as_str().to_string(),
                actual: decoded.len(),
                expected: algorithm.digest_len(),
            });
        }

        Ok(Self {
            algorithm,
            digest: digest.to_string(),
        })
    }

    /// Hash everything `reader` yields and describe it with `algorithm`.
    pub fn compute<R: Read>(algorithm: Algorithm, mut reader: R) -> io::Result<Self> {
        let mut hasher = algorithm.hasher();
        let mut buf = vec![0u8; DEFAULT_CHUNK_SIZE];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buf[..n]);
        }
        Ok(Self {
            algorithm,
            digest: BASE64.encode(hasher.finalize()),
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The expected digest, base64 encoded.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Stream `reader` through a verifier using [`DEFAULT_CHUNK_SIZE`] reads.
    pub fn verify<R: Read>(&self, reader: R) -> Verify<R> {
        self.verify_with_chunk_size(reader, DEFAULT_CHUNK_SIZE)
    }

    pub fn verify_with_chunk_size<R: Read>(&self, reader: R, chunk_size: usize) -> Verify<R> {
        Verify::new(
            reader,
            self.algorithm.hasher(),
            self.digest.clone(),
            chunk_size,
        )
    }

    /// Copy `reader` into `writer` through a verifier. Returns bytes written.
    ///
    /// Every chunk is written before the digest is checked, so on mismatch the
    /// writer already holds the full (bad) payload. Read failures come back as
    /// [`VerifyError::Io`], write failures as [`VerifyError::Write`].
    pub fn verify_copy<R: Read, W: Write>(
        &self,
        reader: R,
        writer: &mut W,
        chunk_size: usize,
    ) -> Result<u64, VerifyError> {
        let mut written = 0u64;
        for chunk in self.verify_with_chunk_size(reader, chunk_size) {
            let chunk = chunk?;
            writer.write_all(&chunk).map_err(VerifyError::Write)?;
            written += chunk.len() as u64;
        }
        writer.flush().map_err(VerifyError::Write)?;
        Ok(written)
    }
}

impl FromStr for Integrity {
    type Err = IntegrityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Integrity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.algorithm, self.digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SCRIPT: &[u8] = b"#!/bin/sh\necho hello\nexit 123";
    const SCRIPT_SHA256: &str = "oRJkj6Cr8nWIivZ9d3W+rVZt/aSW1l9YtxSVh+GtIHM=";

    fn collect(verify: impl Iterator<Item = Result<Vec<u8>, VerifyError>>) -> (Vec<u8>, Option<VerifyError>) {
        let mut out = Vec::new();
        for item in verify {
            match item {
                Ok(chunk) => out.extend_from_slice(&chunk),
                Err(e) => return (out, Some(e)),
            }
        }
        (out, None)
    }

    #[test]
    fn parse_sha256() {
        let sri = Integrity::parse(&format!("sha256-{SCRIPT_SHA256}")).unwrap();
        assert_eq!(sri.algorithm(), Algorithm::Sha256);
        assert_eq!(sri.digest(), SCRIPT_SHA256);
        assert_eq!(sri.to_string(), format!("sha256-{SCRIPT_SHA256}"));
    }

    #[test]
    fn parse_known_digests_for_other_algorithms() {
        let cases = [
            ("sha1", "Kq5sNclPz7QV2+lfQIuc6R7oRu0="),
            ("sha224", "LwVHf8JLtPrv2GUXFW2v3s7EW4rTzyUipWNYKw=="),
            ("sha384", "/b2OdaZ/KfcBpOBAOF4uI5hjA+oQI5IRr5B/y7g1eLPkF8txzmRu/QgZ3YwIjeG9"),
            ("sha512", "MJ7MSJwS1utMxA9QyQLytNDtd+5RGnx6m808qG1M2G+YndNbxf9JlnDaNCVbRbDP2DDoH2Bdz33FVC6TrpzXbw=="),
            ("sha512_224", "IuDVIzb2SpmAhQeLBabjeyb4Eg9Dv020xDpk7g=="),
            ("sha512_256", "CsVh+sg4EE4/LkrRB7S+4+k4vxXysV8AnMzNYakT8Bc="),
            ("sha3_224", "37fxjHfpKLtW+ustonKRvXkLwQRc3kXzIQu2xQ=="),
            ("sha3_256", "ZEvMflZDcwQJmarInnYi88px+6HZcv2Uoxw7+/JOOTg="),
            ("sha3_384", "g7/yjd4bG/WBAHHGZDwI5bBb24Nu/9cLQD6o6gpjTcSZfrEFOqNZP1kPnGNjDdkL"),
            ("sha3_512", "hAAGZT6ayelRF6FckVyquBZikY6SXengBPd0/4LXB5pA1NJ7GzcmV8YdRtRwMEyIx4izpFJ60HTR3MvuXbqpmg=="),
            ("blake2b", "Ahzth5kpbOylV4MquUGlC0oR+DR4zxQfUfkz9lOrn7zAWgN83b7QbjCb8zSULE5YzfGkbiN5EczX/Pl4fLx/0A=="),
            ("blake2s", "muxoBnlFYRB+WUsfaoprDJKgy6ms9eXpPMoG94GBOws="),
        ];
        for (alg, digest) in cases {
            let sri = Integrity::parse(&format!("{alg}-{digest}")).unwrap();
            let (out, err) = collect(sri.verify(Cursor::new(b"hello world")));
            assert!(err.is_none(), "{alg}: {err:?}");
            assert_eq!(out, b"hello world");
        }
    }

    #[test]
    fn parse_rejects_missing_separator() {
        assert_eq!(
            Integrity::parse("sha256").unwrap_err(),
            IntegrityError::MissingSeparator("sha256".to_string())
        );
    }

    #[test]
    fn parse_rejects_unknown_algorithm() {
        let err = Integrity::parse(&format!("md5-{SCRIPT_SHA256}")).unwrap_err();
        match &err {
            IntegrityError::UnsupportedAlgorithm { algorithm, available } => {
                assert_eq!(algorithm, "md5");
                assert!(available.contains(&"sha256".to_string()));
            }
            other => panic!("expected UnsupportedAlgorithm, got {other:?}"),
        }
        assert!(err.to_string().starts_with("`md5` is not available"));
    }

    #[test]
    fn parse_rejects_invalid_base64() {
        assert_eq!(
            Integrity::parse("sha256-not base64!").unwrap_err(),
            IntegrityError::InvalidBase64
        );
        // Missing padding is not canonical.
        assert_eq!(
            Integrity::parse("sha256-oRJkj6Cr8nWIivZ9d3W+rVZt/aSW1l9YtxSVh+GtIHM").unwrap_err(),
            IntegrityError::InvalidBase64
        );
    }

    #[test]
    fn parse_rejects_wrong_digest_length() {
        let err = Integrity::parse("sha256-xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx").unwrap_err();
        assert_eq!(
            err,
            IntegrityError::InvalidLength {
                algorithm: "sha256".to_string(),
                actual: 33,
                expected: 32,
            }
        );
        assert_eq!(
            err.to_string(),
            "invalid checksum length of 33 for sha256, expected 32"
        );

        // A valid sha256 digest declared as sha512 is too short.
        let err = Integrity::parse(&format!("sha512-{SCRIPT_SHA256}")).unwrap_err();
        assert!(matches!(
            err,
            IntegrityError::InvalidLength { actual: 32, expected: 64, .. }
        ));
    }

    #[test]
    fn verify_passes_bytes_through_unchanged() {
        let sri = Integrity::parse(&format!("sha256-{SCRIPT_SHA256}")).unwrap();
        for chunk_size in [1, 3, 7, 4096] {
            let chunks: Vec<Vec<u8>> = sri
                .verify_with_chunk_size(Cursor::new(SCRIPT), chunk_size)
                .collect::<Result<_, _>>()
                .unwrap();
            assert!(chunks.iter().all(|c| c.len() <= chunk_size));
            assert_eq!(chunks.concat(), SCRIPT);
        }
    }

    #[test]
    fn verify_every_algorithm_over_computed_digest() {
        assert_eq!(ALGORITHMS.len(), 13);
        let data: Vec<u8> = (0u8..=255).cycle().take(10_000).collect();
        for alg in ALGORITHMS {
            let computed = Integrity::compute(alg, Cursor::new(&data)).unwrap();
            let sri = Integrity::parse(&computed.to_string()).unwrap();
            let (out, err) = collect(sri.verify_with_chunk_size(Cursor::new(&data), 512));
            assert!(err.is_none(), "{alg}: {err:?}");
            assert_eq!(out, data);
        }
    }

    #[test]
    fn single_byte_mutation_is_a_mismatch() {
        let sri = Integrity::parse(&format!("sha256-{SCRIPT_SHA256}")).unwrap();
        for i in 0..SCRIPT.len() {
            let mut mutated = SCRIPT.to_vec();
            mutated[i] ^= 0x01;
            let (out, err) = collect(sri.verify_with_chunk_size(Cursor::new(&mutated), 8));
            assert_eq!(out, mutated, "all bytes are yielded before the mismatch");
            let err = err.expect("mutation must fail verification");
            let m = err.mismatch().expect("mismatch error");
            assert_eq!(m.expected(), SCRIPT_SHA256);
            assert_ne!(m.actual(), m.expected());
        }
    }

    #[test]
    fn mismatch_reports_actual_digest() {
        let sri = Integrity::parse(&format!("sha256-{SCRIPT_SHA256}")).unwrap();
        let (_, err) = collect(sri.verify(Cursor::new(b"xxxxxxx")));
        let err = err.unwrap();
        let m = err.mismatch().unwrap();
        assert_eq!(m.actual(), "e3DTq0x2QVQuHxWLRY7q58+3vbgV1BEMxheLr8/fQ/g=");
    }

    #[test]
    fn verify_is_fused_after_mismatch() {
        let sri = Integrity::parse(&format!("sha256-{SCRIPT_SHA256}")).unwrap();
        let mut it = sri.verify(Cursor::new(b""));
        assert!(matches!(it.next(), Some(Err(VerifyError::Mismatch(_)))));
        assert!(it.next().is_none());
        assert!(it.next().is_none());
    }

    #[test]
    fn empty_source_with_empty_digest() {
        let sri = Integrity::parse("sha256-47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=").unwrap();
        let mut it = sri.verify(Cursor::new(b""));
        assert!(it.next().is_none());
    }

    #[test]
    fn verify_copy_writes_everything_then_checks() {
        let sri = Integrity::parse(&format!("sha256-{SCRIPT_SHA256}")).unwrap();
        let mut out = Vec::new();
        let n = sri.verify_copy(Cursor::new(SCRIPT), &mut out, 4).unwrap();
        assert_eq!(n, SCRIPT.len() as u64);
        assert_eq!(out, SCRIPT);

        let mut out = Vec::new();
        let err = sri.verify_copy(Cursor::new(b"xxxxxxx"), &mut out, 4).unwrap_err();
        assert!(err.mismatch().is_some());
        assert_eq!(out, b"xxxxxxx");
    }

    #[test]
    fn read_errors_surface_as_io() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            }
        }
        let sri = Integrity::parse(&format!("sha256-{SCRIPT_SHA256}")).unwrap();
        let mut it = sri.verify(Broken);
        match it.next() {
            Some(Err(VerifyError::Io(e))) => assert_eq!(e.kind(), io::ErrorKind::ConnectionReset),
            other => panic!("expected io error, got {other:?}"),
        }
        assert!(it.next().is_none());
    }

    #[test]
    fn verify_copy_separates_write_failures() {
        struct Full;
        impl Write for Full {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::StorageFull, "no space left"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        let sri = Integrity::parse(&format!("sha256-{SCRIPT_SHA256}")).unwrap();
        match sri.verify_copy(Cursor::new(SCRIPT), &mut Full, 4) {
            Err(VerifyError::Write(e)) => assert_eq!(e.kind(), io::ErrorKind::StorageFull),
            other => panic!("expected write error, got {other:?}"),
        }
    }

    #[test]
    fn compute_matches_known_digest() {
        let sri = Integrity::compute(Algorithm::Sha256, Cursor::new(SCRIPT)).unwrap();
        assert_eq!(sri.to_string(), format!("sha256-{SCRIPT_SHA256}"));
    }
}
