//! Session settings
//!
//! Chosen by the player before a session starts. Values are validated here so
//! the simulation core can treat anything it receives as well-formed.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Reasons a settings value is rejected
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("target total {0} is not one of {opts:?}", opts = TARGET_TOTAL_OPTIONS)]
    TargetTotal(u32),
    #[error("group size {0} is not one of {opts:?}", opts = GROUP_SIZE_OPTIONS)]
    GroupSize(u32),
    #[error("group size {0} has not been unlocked yet")]
    GroupSizeLocked(u32),
    #[error("max levels must be at least 1")]
    MaxLevels,
    #[error("play area {width}x{height} cannot fit a target")]
    PlayArea { width: f32, height: f32 },
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Game settings for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ceiling on targets spawned over the whole session
    pub target_total: u32,
    /// Targets that must be processed to finish a level
    pub group_size: u32,
    /// Level cap; `None` ends the session only when the quota runs out
    pub max_levels: Option<u32>,
    /// Targets bounce off the bottom edge once they have entered the area
    pub floor_bounce: bool,
    /// Play area width
    pub width: f32,
    /// Play area height
    pub height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_total: DEFAULT_TARGET_TOTAL,
            group_size: DEFAULT_GROUP_SIZE,
            max_levels: Some(MAX_LEVELS),
            floor_bounce: true,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Settings {
    /// Smallest width that fits the largest spawn radius plus side padding
    pub fn min_width() -> f32 {
        2.0 * (TARGET_RADIUS_MAX + SPAWN_SIDE_PADDING)
    }

    /// Check every field against the allowed options
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !TARGET_TOTAL_OPTIONS.contains(&self.target_total) {
            return Err(SettingsError::TargetTotal(self.target_total));
        }
        if !GROUP_SIZE_OPTIONS.contains(&self.group_size) {
            return Err(SettingsError::GroupSize(self.group_size));
        }
        if self.max_levels == Some(0) {
            return Err(SettingsError::MaxLevels);
        }
        if !self.has_valid_area() {
            return Err(SettingsError::PlayArea {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Parse and validate settings from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        log::info!(
            "Loaded settings: {} targets in groups of {}",
            settings.target_total,
            settings.group_size
        );
        Ok(settings)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Play area is finite and wide enough to spawn into
    pub(crate) fn has_valid_area(&self) -> bool {
        self.width.is_finite()
            && self.height.is_finite()
            && self.width > Self::min_width()
            && self.height > 0.0
    }
}
