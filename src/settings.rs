// src/settings.rs
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use crate::drivers::Palette;
use crate::types::ConnectionMode;

pub const DEFAULT_SETTINGS_FILE: &str = ".viewer_settings.json";

/// Viewer preferences persisted as JSON next to the binary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub stream_url: String,
    pub colormap: String,
    pub connection_mode: ConnectionMode,
    pub snapshot_dir: String,
    pub read_timeout_ms: u64,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            stream_url: "ws://localhost:8000/ws".to_owned(),
            colormap: Palette::default().name().to_owned(),
            connection_mode: ConnectionMode::Live,
            snapshot_dir: ".".to_owned(),
            read_timeout_ms: 50,
        }
    }
}

impl ViewerSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Missing file means defaults; a broken one is reported and ignored.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => {
                info!("loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                warn!("{e:#}; using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).with_context(|| format!("writing settings to {}", path.display()))
    }

    /// Unknown names fall back to the default palette.
    pub fn palette(&self) -> Palette {
        self.colormap.parse().unwrap_or_else(|e| {
            warn!("{e}; using {}", Palette::default());
            Palette::default()
        })
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn snapshot_dir(&self) -> PathBuf {
        PathBuf::from(&self.snapshot_dir)
    }
}
