//! Persisted user preferences with change notification.
//!
//! The store owns the file and a `watch` channel; every update replaces the
//! whole `Preferences` value, so readers always see a complete snapshot.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::watch;

pub const SUPPRESS_NATIVE_DOWNLOAD_DIALOG: &str = "suppressNativeDownloadDialog";
pub const USE_CUSTOM_CONTROLS: &str = "useCustomControls";
pub const USE_DARK_THEME: &str = "useDarkTheme";

/// All known preference keys, in display order.
pub const KEYS: [&str; 3] = [
    SUPPRESS_NATIVE_DOWNLOAD_DIALOG,
    USE_CUSTOM_CONTROLS,
    USE_DARK_THEME,
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreferenceError {
    #[error("unknown preference key: {0}")]
    UnknownKey(String),
    #[error("invalid value for {key}: {value} (expected true or false)")]
    InvalidValue { key: String, value: String },
}

/// User-facing switches. Each field is applied independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    /// Cancel the browser's own download when a QuickTime file is intercepted.
    pub suppress_native_download_dialog: bool,
    pub use_custom_controls: bool,
    pub use_dark_theme: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            suppress_native_download_dialog: false,
            use_custom_controls: true,
            use_dark_theme: true,
        }
    }
}

impl Preferences {
    pub fn get(&self, key: &str) -> Result<bool, PreferenceError> {
        match key {
            SUPPRESS_NATIVE_DOWNLOAD_DIALOG => Ok(self.suppress_native_download_dialog),
            USE_CUSTOM_CONTROLS => Ok(self.use_custom_controls),
            USE_DARK_THEME => Ok(self.use_dark_theme),
            other => Err(PreferenceError::UnknownKey(other.to_string())),
        }
    }

    /// Returns a copy with `key` set to the parsed `value`.
    pub fn with(self, key: &str, value: &str) -> Result<Self, PreferenceError> {
        let flag = parse_flag(key, value)?;
        let mut next = self;
        match key {
            SUPPRESS_NATIVE_DOWNLOAD_DIALOG => next.suppress_native_download_dialog = flag,
            USE_CUSTOM_CONTROLS => next.use_custom_controls = flag,
            USE_DARK_THEME => next.use_dark_theme = flag,
            other => return Err(PreferenceError::UnknownKey(other.to_string())),
        }
        Ok(next)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, PreferenceError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(PreferenceError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Read side of the store. Cheap to clone; one per consumer.
#[derive(Debug, Clone)]
pub struct PreferencesHandle {
    rx: watch::Receiver<Preferences>,
}

impl PreferencesHandle {
    /// Handle over a value that never changes (no backing store).
    pub fn fixed(prefs: Preferences) -> Self {
        let (_tx, rx) = watch::channel(prefs);
        Self { rx }
    }

    pub fn current(&self) -> Preferences {
        *self.rx.borrow()
    }

    /// Waits for the next replacement. Returns `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<Preferences> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }
}

/// Durable preference store backed by `~/.config/movstream/preferences.toml`.
pub struct PreferenceStore {
    path: PathBuf,
    tx: watch::Sender<Preferences>,
}

pub fn preferences_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("movstream")?;
    Ok(xdg_dirs.place_config_file("preferences.toml")?)
}

impl PreferenceStore {
    pub fn open_default() -> Result<Self> {
        Self::open_at(&preferences_path()?)
    }

    /// Opens the store at `path`, writing defaults if the file does not exist.
    pub fn open_at(path: &Path) -> Result<Self> {
        let prefs = if path.exists() {
            read_file(path)?
        } else {
            let prefs = Preferences::default();
            write_file(path, &prefs)?;
            tracing::info!("created default preferences at {}", path.display());
            prefs
        };
        let (tx, _rx) = watch::channel(prefs);
        Ok(Self {
            path: path.to_path_buf(),
            tx,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current(&self) -> Preferences {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> PreferencesHandle {
        PreferencesHandle {
            rx: self.tx.subscribe(),
        }
    }

    /// Sets one key, persists, and notifies subscribers.
    pub fn set(&self, key: &str, value: &str) -> Result<Preferences> {
        let next = self.current().with(key, value)?;
        self.replace(next)?;
        Ok(next)
    }

    /// Persists `prefs` and publishes it as the new value.
    pub fn replace(&self, prefs: Preferences) -> Result<()> {
        write_file(&self.path, &prefs)?;
        self.tx.send_replace(prefs);
        tracing::debug!("preferences updated: {:?}", prefs);
        Ok(())
    }

    /// Re-reads the file (e.g. after an external edit) and publishes it if it differs.
    pub fn reload(&self) -> Result<Preferences> {
        let prefs = read_file(&self.path)?;
        let changed = self.tx.send_if_modified(|cur| {
            if *cur == prefs {
                false
            } else {
                *cur = prefs;
                true
            }
        });
        if changed {
            tracing::debug!("preferences reloaded: {:?}", prefs);
        }
        Ok(prefs)
    }
}

fn read_file(path: &Path) -> Result<Preferences> {
    let data = fs::read_to_string(path)?;
    Ok(toml::from_str(&data)?)
}

fn write_file(path: &Path, prefs: &Preferences) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml::to_string_pretty(prefs)?)?;
    Ok(())
}
