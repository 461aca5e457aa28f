use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Pipeline configuration loaded from `~/.config/movstream/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovConfig {
    /// Seconds the element gets to report loaded/can-play before the fallback fetch.
    pub load_timeout_secs: u64,
    /// Connect timeout for the HEAD probe and the fallback GET.
    pub probe_connect_timeout_secs: u64,
    /// Total timeout for the HEAD probe.
    pub probe_timeout_secs: u64,
    /// Total timeout for the fallback GET (whole body is buffered in memory).
    pub fetch_timeout_secs: u64,
    /// Local page the viewer is opened at; the encoded locator goes in its fragment.
    pub viewer_page: String,
}

impl Default for MovConfig {
    fn default() -> Self {
        Self {
            load_timeout_secs: 15,
            probe_connect_timeout_secs: 15,
            probe_timeout_secs: 30,
            fetch_timeout_secs: 600,
            viewer_page: "player.html".to_string(),
        }
    }
}

impl MovConfig {
    pub fn load_timeout(&self) -> Duration {
        Duration::from_secs(self.load_timeout_secs)
    }

    pub fn probe_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_connect_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("movstream")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MovConfig> {
    load_or_init_at(&config_path()?)
}

/// Like `load_or_init` but for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<MovConfig> {
    if !path.exists() {
        let default_cfg = MovConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: MovConfig = toml::from_str(&data)?;
    Ok(cfg)
}
