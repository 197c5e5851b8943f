use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::allow_list::{AllowList, DEFAULT_ALLOWED_HOSTS};
use crate::badge::DEFAULT_BADGE_COLOR;

/// Global configuration loaded from `~/.config/pdgrab/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdgrabConfig {
    /// Match patterns (`<scheme>://<host>/<path>`) of origins whose requests are observed.
    pub allowed_hosts: Vec<String>,
    /// When false, every request is classified regardless of origin.
    pub filter_hosts: bool,
    /// Badge background color shown next to the candidate count.
    pub badge_color: String,
    /// Capture store file; defaults to `~/.local/state/pdgrab/captures.json`.
    pub store_path: Option<PathBuf>,
}

impl Default for PdgrabConfig {
    fn default() -> Self {
        Self {
            allowed_hosts: DEFAULT_ALLOWED_HOSTS.iter().map(|s| s.to_string()).collect(),
            filter_hosts: true,
            badge_color: DEFAULT_BADGE_COLOR.to_string(),
            store_path: None,
        }
    }
}

impl PdgrabConfig {
    /// Compiled allow-list, or `None` when host filtering is off.
    pub fn allow_list(&self) -> Result<Option<AllowList>> {
        if !self.filter_hosts {
            return Ok(None);
        }
        let list = AllowList::new(&self.allowed_hosts).context("invalid allowed_hosts entry")?;
        Ok(Some(list))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pdgrab")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PdgrabConfig> {
    load_or_init_at(&config_path()?)
}

/// Same as [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<PdgrabConfig> {
    if !path.exists() {
        let default_cfg = PdgrabConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: PdgrabConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
