//! CLI for hookdl.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hookdl_core::config;
use hookdl_core::env::DEFAULT_VERSION;
use hookdl_core::Algorithm;
use std::path::PathBuf;

use commands::{run_check, run_install, run_integrity, run_platform, run_program};

/// Top-level CLI for hookdl.
#[derive(Debug, Parser)]
#[command(name = "hookdl")]
#[command(about = "hookdl: verified per-platform artifact installs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Install the artifact for this host from a manifest file.
    Install {
        /// Manifest file: four-line entries (platform, integrity, URL, filename)
        /// separated by blank lines.
        manifest: PathBuf,
        #[arg(long, default_value = DEFAULT_VERSION)]
        version: String,
        /// Installation root (default: config `root`, then the XDG cache dir).
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Re-verify an installation against its recorded digests.
    Check {
        #[arg(long, default_value = DEFAULT_VERSION)]
        version: String,
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Print the host platform as `os/cpu`.
    Platform,

    /// Print the integrity string of a file.
    Integrity {
        path: PathBuf,
        #[arg(long, short, default_value = "sha256", value_parser = parse_algorithm)]
        algorithm: Algorithm,
    },

    /// Run a program with an installation directory prepended to PATH.
    Run {
        #[arg(long, default_value = DEFAULT_VERSION)]
        version: String,
        #[arg(long)]
        root: Option<PathBuf>,
        program: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

fn parse_algorithm(raw: &str) -> Result<Algorithm, String> {
    Algorithm::from_name(raw).ok_or_else(|| {
        format!(
            "unsupported algorithm `{}`, valid values are: {}",
            raw,
            Algorithm::names().join(", ")
        )
    })
}

impl CliCommand {
    /// Parse arguments and dispatch. Returns the process exit code.
    pub fn run_from_args() -> Result<i32> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let resolve_root = |root: Option<PathBuf>| match root {
            Some(root) => Ok(root),
            None => cfg.root(),
        };

        match cli.command {
            CliCommand::Install {
                manifest,
                version,
                root,
            } => run_install(&cfg, &resolve_root(root)?, &version, &manifest)?,
            CliCommand::Check { version, root } => {
                return run_check(&resolve_root(root)?, &version);
            }
            CliCommand::Platform => run_platform()?,
            CliCommand::Integrity { path, algorithm } => run_integrity(&path, algorithm)?,
            CliCommand::Run {
                version,
                root,
                program,
                args,
            } => return run_program(&resolve_root(root)?, &version, &program, &args),
        }

        Ok(0)
    }
}

#[cfg(test)]
mod tests;
