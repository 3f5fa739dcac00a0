// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback settings for the animation controller.

use crate::error::{AnimationError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Offset used when jumping to the previous keyframe, so the keyframe at the
/// current time is skipped
pub const DEFAULT_KEYFRAME_EPSILON: f32 = 1e-4;

/// Playback configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaybackSettings {
    /// Multiplier applied to elapsed time
    pub speed: f32,
    /// Wrap to the span start at the end; otherwise stop at the end
    pub looping: bool,
    /// Offset for jumping to the previous keyframe
    pub keyframe_epsilon: f32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            speed: 1.0,
            looping: true,
            keyframe_epsilon: DEFAULT_KEYFRAME_EPSILON,
        }
    }
}

impl PlaybackSettings {
    /// Load settings from a RON file
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| AnimationError::io(path, e))?;
        let settings = ron::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings to a RON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let config = ron::ser::PrettyConfig::default().struct_names(true);
        let content = ron::ser::to_string_pretty(self, config)?;
        std::fs::write(path, content).map_err(|e| AnimationError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = PlaybackSettings::default();
        assert_eq!(settings.speed, 1.0);
        assert!(settings.looping);
        assert_eq!(settings.keyframe_epsilon, DEFAULT_KEYFRAME_EPSILON);
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let settings: PlaybackSettings = ron::from_str("(looping: false)").unwrap();
        assert!(!settings.looping);
        assert_eq!(settings.speed, 1.0);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(ron::from_str::<PlaybackSettings>("(rate: 2.0)").is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("playback.ron");

        let settings = PlaybackSettings {
            speed: 0.5,
            looping: false,
            keyframe_epsilon: 1e-3,
        };
        settings.save(&path).unwrap();
        assert_eq!(PlaybackSettings::load(&path).unwrap(), settings);
    }
}
