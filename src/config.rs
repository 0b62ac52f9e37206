//! Tuning constants for layout, geometry, motion and scenery.
//!
//! Every field has a default; a JSON file only needs to name what it overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read config: {e}"),
            ConfigError::Parse(e) => write!(f, "Invalid config JSON: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

/// Viewport-to-world layout rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub camera_height: f32,
    /// Height of a sign's centre; the frustum is narrower there than on the ground.
    pub sign_height: f32,
    pub train_visual_width: f32,
    pub max_track_margin: f32,
    pub track_margin_ratio: f32,
    pub min_spacing: f32,
    pub spacing_per_viewport: f32,
    pub track_end_padding: f32,
    pub right_margin_ratio: f32,
    pub sign_fill_ratio: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            camera_height: 16.0,
            sign_height: 3.0,
            train_visual_width: 4.0,
            max_track_margin: 3.0,
            track_margin_ratio: 0.15,
            min_spacing: 20.0,
            spacing_per_viewport: 1.5,
            track_end_padding: 20.0,
            right_margin_ratio: 0.05,
            sign_fill_ratio: 0.8,
        }
    }
}

/// Fixed geometric constants for the main line and branches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    pub turn_radius: f32,
    pub transition: f32,
    pub sign_track_gap: f32,
    /// Control-point factor approximating a quarter circle with a cubic Bezier.
    pub bezier_k: f32,
    pub lead_in: f32,
    pub start_z: f32,
    /// Track extends this far past `track_length`.
    pub end_padding: f32,
    pub rail_height: f32,
    /// Extra straight past the last branch sign.
    pub branch_tail: f32,
    pub gauge: f32,
    pub sleeper_spacing: f32,
    pub rail_samples: usize,
    /// Branches overlap the main line for this far beyond the lead-in.
    pub branch_render_overlap: f32,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            turn_radius: 5.0,
            transition: 3.0,
            sign_track_gap: 5.0,
            bezier_k: 0.552_284_75,
            lead_in: 9.0,
            start_z: -10.0,
            end_padding: 10.0,
            rail_height: 0.6,
            branch_tail: 10.0,
            gauge: 0.7,
            sleeper_spacing: 0.6,
            rail_samples: 200,
            branch_render_overlap: 3.0,
        }
    }
}

impl TrackConfig {
    /// Offset from a station's sign Z to its branch junction Z.
    pub fn junction_gap(&self) -> f32 {
        self.sign_track_gap - self.transition - self.turn_radius
    }
}

/// Speeds and thresholds for autopilot, scrolling and the follow camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub main_speed: f32,
    pub branch_speed: f32,
    /// World distance under which an autopilot snaps onto its target.
    pub snap_distance: f32,
    pub forced_sync_frames: u32,
    pub scroll_pages_per_station: f32,
    /// Height of the scrolled page's viewport, in the same units as wheel deltas.
    pub scroll_client_height: f32,
    pub wheel_speed: f32,
    pub touch_speed: f32,
    pub camera_smoothing: f32,
    /// Distance from the train front to its visual centre.
    pub train_center_offset: f32,
    pub default_view_offset_max: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            main_speed: 25.0,
            branch_speed: 20.0,
            snap_distance: 0.1,
            forced_sync_frames: 60,
            scroll_pages_per_station: 1.5,
            scroll_client_height: 800.0,
            wheel_speed: 0.02,
            touch_speed: 0.05,
            camera_smoothing: 2.0,
            train_center_offset: 3.05,
            default_view_offset_max: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub front_spacing: f32,
    pub rear_spacing: f32,
    pub heading_lift: f32,
    pub rig_height: f32,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            front_spacing: 3.05,
            rear_spacing: 3.55,
            heading_lift: 0.8,
            rig_height: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    pub seed: u64,
    pub margin: f32,
    pub hue: f32,
    pub saturation: f32,
    pub min_lightness: f32,
    pub max_lightness: f32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            seed: 0x5747_4154,
            margin: 10.0,
            hue: 0.3,
            saturation: 0.8,
            min_lightness: 0.4,
            max_lightness: 0.6,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub layout: LayoutConfig,
    pub track: TrackConfig,
    pub motion: MotionConfig,
    pub train: TrainConfig,
    pub ground: GroundConfig,
}

impl SceneConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::Parse)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded scene config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn junction_gap_default() {
        assert_eq!(TrackConfig::default().junction_gap(), -3.0);
    }

    #[test]
    fn empty_json_yields_defaults() {
        let config = SceneConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config =
            SceneConfig::from_json_str(r#"{ "motion": { "main_speed": 40.0 } }"#).unwrap();
        assert_eq!(config.motion.main_speed, 40.0);
        assert_eq!(config.motion.branch_speed, 20.0);
        assert_eq!(config.track, TrackConfig::default());
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let result = SceneConfig::from_json_str("{ nope");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = SceneConfig::from_path("does/not/exist.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
