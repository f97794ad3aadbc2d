//! Timeline settings, persisted as JSON in the OS config directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimelineError};

const SETTINGS_FILE: &str = "settings.json";

/// Tunables for one timeline instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Snap unit in seconds. Takes precedence over `snap_minutes`.
    pub snap_seconds: Option<i64>,
    pub snap_minutes: Option<i64>,
    /// Height of one stacking level in a row.
    pub item_height: f32,
    pub group_column_width: f32,
    pub header_height: f32,
    /// Grab zone at each end of an item bar.
    pub resize_handle_width: f32,
    pub move_throttle_ms: u64,
    /// How long the drag-to-create hint stays up.
    pub drag_to_create_popup_ms: u64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            snap_seconds: None,
            snap_minutes: None,
            item_height: 30.0,
            group_column_width: 180.0,
            header_height: 44.0,
            resize_handle_width: 7.0,
            move_throttle_ms: 20,
            drag_to_create_popup_ms: 3_000,
        }
    }
}

impl TimelineConfig {
    /// Effective snap unit: seconds, else minutes, else one second.
    pub fn snap_unit_seconds(&self) -> i64 {
        self.snap_seconds
            .or(self.snap_minutes.map(|m| m * 60))
            .unwrap_or(1)
            .max(0)
    }

    pub fn move_throttle(&self) -> Duration {
        Duration::from_millis(self.move_throttle_ms)
    }

    pub fn drag_to_create_popup(&self) -> Duration {
        Duration::from_millis(self.drag_to_create_popup_ms)
    }

    /// Location of the settings file, falling back to the working directory.
    pub fn default_path() -> PathBuf {
        match directories::ProjectDirs::from("", "", "GanttTimeline") {
            Some(dirs) => dirs.config_dir().join(SETTINGS_FILE),
            None => PathBuf::from(".").join(SETTINGS_FILE),
        }
    }

    /// Load from the default location. Missing or unreadable settings yield
    /// the defaults.
    pub fn load() -> Self {
        let path = Self::default_path();
        match Self::load_from(&path) {
            Ok(config) => {
                info!("loaded timeline settings from {}", path.display());
                config
            }
            Err(TimelineError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                info!("no settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                warn!("ignoring timeline settings: {e}");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| TimelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| TimelineError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, json).map_err(|source| TimelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("saved timeline settings to {}", path.display());
        Ok(())
    }
}
