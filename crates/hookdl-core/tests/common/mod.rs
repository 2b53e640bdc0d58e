pub mod http_server;

use std::path::Path;

pub const SCRIPT: &[u8] = b"#!/bin/sh\necho hello\nexit 123";
pub const SCRIPT_SHA256: &str = "oRJkj6Cr8nWIivZ9d3W+rVZt/aSW1l9YtxSVh+GtIHM=";

/// A four-line manifest entry.
pub fn entry(platform: &str, sri: &str, url: &str, filename: &str) -> String {
    format!("{platform}\n{sri}\n{url}\n{filename}")
}

pub fn record_text(dir: &Path) -> Option<String> {
    std::fs::read_to_string(dir.join(hookdl_core::record::RECORD_FILE)).ok()
}
