use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::Time;

/// Width and height of a video frame in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub x: u32,
    pub y: u32,
}

impl Resolution {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Export resolution reported when no device knows its own.
    pub default_resolution: Resolution,
    /// Time between two scheduling ticks of the frame loop.
    pub frame_interval_ms: u64,
    /// Tolerance used when deciding whether two items play one source
    /// continuously.
    pub merge_epsilon: Time,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_resolution: Resolution::default(),
            frame_interval_ms: 16,
            merge_epsilon: 1e-6,
        }
    }
}

impl PlayerConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }

    /// Loads the user config, falling back to defaults when it is missing or
    /// cannot be parsed.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        if !config_path.exists() {
            log::info!("No config file found at {}, using defaults", config_path.display());
            return Self::default();
        }

        match Self::load_from(&config_path) {
            Ok(config) => {
                log::info!("Loaded config from {}", config_path.display());
                config
            }
            Err(e) => {
                log::warn!("Config file exists but has issues ({}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file at {}: {}", path.display(), e))?;
        let config = serde_json::from_str::<Self>(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file at {}: {}", path.display(), e))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::debug!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("timeline-player")
            .join("config.json")
    }
}
