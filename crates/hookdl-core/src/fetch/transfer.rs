//! Single libcurl GET on a worker thread, body exposed as a blocking `Read`.
//!
//! The transfer pushes body chunks into a bounded channel, so a slow consumer
//! throttles the download instead of letting it buffer in memory.

use std::io::{self, Read};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread;

use super::{Fetch, FetchError};
use crate::config::FetchConfig;
use crate::locator::Locator;

type Chunk = io::Result<Vec<u8>>;

/// Default [`Fetch`] implementation backed by the curl crate.
///
/// Follows redirects, treats HTTP status >= 400 as an error, and sets no
/// timeouts; callers wanting a deadline must impose it from outside.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    max_redirections: u32,
    channel_depth: usize,
    user_agent: String,
}

impl CurlFetcher {
    pub fn new(cfg: &FetchConfig) -> Self {
        Self {
            max_redirections: cfg.max_redirections,
            channel_depth: cfg.channel_depth.max(1),
            user_agent: cfg.user_agent.clone(),
        }
    }
}

impl Default for CurlFetcher {
    fn default() -> Self {
        Self::new(&FetchConfig::default())
    }
}

impl Fetch for CurlFetcher {
    type Reader = BodyReader;

    /// Starts the transfer and blocks until the first body chunk (or the end of
    /// the transfer) arrives, so connection and HTTP errors surface here.
    fn open(&self, locator: &Locator) -> Result<BodyReader, FetchError> {
        let (tx, rx) = mpsc::sync_channel::<Chunk>(self.channel_depth);
        let url = locator.as_str().to_string();
        let opts = self.clone();

        thread::Builder::new()
            .name("hookdl-fetch".to_string())
            .spawn(move || {
                if let Err(e) = get(&url, &opts, &tx) {
                    tracing::debug!("GET {} failed: {}", url, e);
                    let _ = tx.send(Err(io::Error::other(e)));
                }
            })
            .map_err(|e| FetchError::new(locator, e))?;

        tracing::debug!("fetching {}", locator);
        match rx.recv() {
            Ok(Ok(first)) => Ok(BodyReader::new(rx, first, false)),
            Ok(Err(e)) => Err(FetchError::new(locator, e)),
            Err(_) => Ok(BodyReader::new(rx, Vec::new(), true)),
        }
    }
}

fn get(url: &str, opts: &CurlFetcher, tx: &SyncSender<Chunk>) -> Result<(), curl::Error> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(opts.max_redirections)?;
    easy.fail_on_error(true)?;
    easy.useragent(&opts.user_agent)?;

    let mut transfer = easy.transfer();
    transfer.write_function(|data| {
        // Reader dropped: returning a short count aborts the transfer.
        Ok(match tx.send(Ok(data.to_vec())) {
            Ok(()) => data.len(),
            Err(_) => 0,
        })
    })?;
    transfer.perform()
}

/// Response body of a [`CurlFetcher`] transfer.
#[derive(Debug)]
pub struct BodyReader {
    rx: Receiver<Chunk>,
    pending: Vec<u8>,
    pos: usize,
    done: bool,
}

impl BodyReader {
    fn new(rx: Receiver<Chunk>, pending: Vec<u8>, done: bool) -> Self {
        Self {
            rx,
            pending,
            pos: 0,
            done,
        }
    }
}

impl Read for BodyReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        while self.pos >= self.pending.len() {
            if self.done {
                return Ok(0);
            }
            match self.rx.recv() {
                Ok(Ok(chunk)) => {
                    self.pending = chunk;
                    self.pos = 0;
                }
                Ok(Err(e)) => {
                    self.done = true;
                    return Err(e);
                }
                Err(_) => {
                    self.done = true;
                    return Ok(0);
                }
            }
        }
        let n = buf.len().min(self.pending.len() - self.pos);
        buf[..n].copy_from_slice(&self.pending[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}
