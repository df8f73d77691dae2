//! Tuning and race configuration
//!
//! Every field defaults to the design constants in `crate::consts`, so a
//! config file only needs the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Cross-section and subdivision parameters for track generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackGeometry {
    /// Longest chord a generated segment may have
    pub seg_length: f32,
    /// Full driving-surface width
    pub circ_width: f32,
    pub border_width: f32,
    pub border_height: f32,
    /// Subdivision stops here even if the chord is still too long
    pub max_subdivision_depth: u32,
}

impl Default for TrackGeometry {
    fn default() -> Self {
        Self {
            seg_length: SEG_LENGTH,
            circ_width: CIRC_WIDTH,
            border_width: BORDER_WIDTH,
            border_height: BORDER_HEIGHT,
            max_subdivision_depth: MAX_SUBDIVISION_DEPTH,
        }
    }
}

impl TrackGeometry {
    /// Lateral run of the border per unit of height
    pub fn border_slope(&self) -> f32 {
        self.border_width / self.border_height
    }
}

/// Vehicle dynamics constants (per-tick units)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleTuning {
    pub levit_height: f32,
    pub inerty: f32,
    pub accel: f32,
    pub max_accel: f32,
    pub rot_angle: f32,
    pub gravity: f32,
    pub border: f32,
    pub ground_reaction_touch_factor: f32,
    pub ground_reaction_factor: f32,
    pub ground_reaction_max: f32,
    pub ground_reaction_height_max: f32,
    pub reaction_factor: f32,
    pub reaction_speed_factor: f32,
    pub reaction_min: f32,
    pub slope_increase: f32,
    pub slope_decrease_factor: f32,
    pub slope_max: f32,
    pub slope_offset_factor: f32,
    pub camera_distance: f32,
    pub wrong_way_tolerance: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            levit_height: LEVIT_HEIGHT,
            inerty: INERTY,
            accel: ACCEL,
            max_accel: MAX_ACCEL,
            rot_angle: ROT_ANGLE,
            gravity: GRAVITY,
            border: BORDER,
            ground_reaction_touch_factor: GROUND_REACTION_TOUCH_FACTOR,
            ground_reaction_factor: GROUND_REACTION_FACTOR,
            ground_reaction_max: GROUND_REACTION_MAX,
            ground_reaction_height_max: GROUND_REACTION_HEIGHT_MAX,
            reaction_factor: REACTION_FACTOR,
            reaction_speed_factor: REACTION_SPEED_FACTOR,
            reaction_min: REACTION_MIN,
            slope_increase: SLOPE_INCREASE,
            slope_decrease_factor: SLOPE_DECREASE_FACTOR,
            slope_max: SLOPE_MAX,
            slope_offset_factor: SLOPE_OFFSET_FACTOR,
            camera_distance: CAMERA_DISTANCE,
            wrong_way_tolerance: WRONG_WAY_TOLERANCE,
        }
    }
}

/// Race rules and clock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceSettings {
    pub lap_count: u32,
    pub tick_interval_ms: u32,
    /// HUD speed = |velocity| * this
    pub speed_display_factor: f32,
}

impl Default for RaceSettings {
    fn default() -> Self {
        Self {
            lap_count: LAP_COUNT,
            tick_interval_ms: TICK_INTERVAL_MS,
            speed_display_factor: SPEED_DISPLAY_FACTOR,
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub track: TrackGeometry,
    pub vehicle: VehicleTuning,
    pub race: RaceSettings,
}

impl Config {
    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the generator or integrator cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.track;
        if !(t.seg_length > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "track.seg_length must be positive, got {}",
                t.seg_length
            )));
        }
        if !(t.circ_width > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "track.circ_width must be positive, got {}",
                t.circ_width
            )));
        }
        if !(t.border_height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "track.border_height must be positive, got {}",
                t.border_height
            )));
        }
        if t.max_subdivision_depth > SUBDIVISION_DEPTH_CEILING {
            return Err(ConfigError::Invalid(format!(
                "track.max_subdivision_depth must be at most {}, got {}",
                SUBDIVISION_DEPTH_CEILING, t.max_subdivision_depth
            )));
        }
        let v = &self.vehicle;
        if !(v.inerty > 0.0 && v.inerty <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "vehicle.inerty must be in (0, 1], got {}",
                v.inerty
            )));
        }
        if !(v.max_accel >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "vehicle.max_accel must not be negative, got {}",
                v.max_accel
            )));
        }
        if !(v.levit_height > 0.0 && v.ground_reaction_height_max > v.levit_height) {
            return Err(ConfigError::Invalid(
                "vehicle.ground_reaction_height_max must exceed a positive levit_height".into(),
            ));
        }
        if self.race.lap_count == 0 {
            return Err(ConfigError::Invalid("race.lap_count must be at least 1".into()));
        }
        if self.race.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("race.tick_interval_ms must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = Config::default();
        assert_eq!(config.track.seg_length, SEG_LENGTH);
        assert_eq!(config.vehicle.inerty, INERTY);
        assert_eq!(config.race.lap_count, LAP_COUNT);
        assert!((config.track.border_slope() - 0.375).abs() < 1e-6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = Config::from_json_str(r#"{ "race": { "lap_count": 5 } }"#).unwrap();
        assert_eq!(config.race.lap_count, 5);
        assert_eq!(config.race.tick_interval_ms, TICK_INTERVAL_MS);
        assert_eq!(config.track, TrackGeometry::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = Config::default();
        config.vehicle.gravity = 0.002;
        let json = config.to_json_string().unwrap();
        assert_eq!(Config::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            Config::from_json_str(r#"{ "track": { "seg_length": 0.0 } }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_json_str(r#"{ "race": { "lap_count": 0 } }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_json_str(
                r#"{ "track": { "seg_length": 1e-9, "max_subdivision_depth": 48 } }"#
            ),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
