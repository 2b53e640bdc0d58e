//! `hookdl platform` – print the host platform.

use anyhow::Result;
use hookdl_core::Platform;

pub fn run_platform() -> Result<()> {
    println!("{}", Platform::host()?);
    Ok(())
}
