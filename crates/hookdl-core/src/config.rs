use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::integrity::DEFAULT_CHUNK_SIZE;

/// Fetch parameters (optional `[fetch]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Maximum number of HTTP redirects followed for one artifact.
    pub max_redirections: u32,
    /// Body chunks buffered between the transfer thread and the writer.
    pub channel_depth: usize,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_redirections: 10,
            channel_depth: 16,
            user_agent: concat!("hookdl/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Global configuration loaded from `~/.config/hookdl/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HookdlConfig {
    /// Installation root; environment directories are allocated under it.
    /// Defaults to the XDG cache dir (`~/.cache/hookdl`).
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// Read size for the verify-while-streaming transform (None = 4096).
    #[serde(default)]
    pub chunk_size: Option<usize>,
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl HookdlConfig {
    pub fn chunk_size(&self) -> usize {
        self.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE).max(1)
    }

    /// Configured root, or the XDG cache directory.
    pub fn root(&self) -> Result<PathBuf> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => default_root(),
        }
    }
}

pub fn default_root() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("hookdl")?;
    Ok(xdg_dirs.get_cache_home())
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("hookdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<HookdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = HookdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: HookdlConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = HookdlConfig::default();
        assert!(cfg.root.is_none());
        assert_eq!(cfg.chunk_size(), 4096);
        assert_eq!(cfg.fetch.max_redirections, 10);
        assert_eq!(cfg.fetch.channel_depth, 16);
        assert!(cfg.fetch.user_agent.starts_with("hookdl/"));
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = HookdlConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: HookdlConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.chunk_size(), cfg.chunk_size());
        assert_eq!(parsed.fetch.max_redirections, cfg.fetch.max_redirections);
        assert_eq!(parsed.fetch.user_agent, cfg.fetch.user_agent);
    }

    #[test]
    fn config_toml_empty_uses_defaults() {
        let cfg: HookdlConfig = toml::from_str("").unwrap();
        assert!(cfg.root.is_none());
        assert_eq!(cfg.chunk_size(), 4096);
        assert_eq!(cfg.fetch.channel_depth, 16);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            root = "/opt/hookdl"
            chunk_size = 65536

            [fetch]
            max_redirections = 2
            user_agent = "ci-runner"
        "#;
        let cfg: HookdlConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.root().unwrap(), PathBuf::from("/opt/hookdl"));
        assert_eq!(cfg.chunk_size(), 65536);
        assert_eq!(cfg.fetch.max_redirections, 2);
        assert_eq!(cfg.fetch.channel_depth, 16);
        assert_eq!(cfg.fetch.user_agent, "ci-runner");
    }

    #[test]
    fn zero_chunk_size_is_clamped() {
        let cfg: HookdlConfig = toml::from_str("chunk_size = 0").unwrap();
        assert_eq!(cfg.chunk_size(), 1);
    }
}
