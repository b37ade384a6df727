//! Data-driven game balance
//!
//! Speeds are in pixels per normalized frame (60 Hz baseline), durations in
//! milliseconds. Loadable from JSON; missing fields fall back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::level::LevelError;

/// Gameplay balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_speed: f32,
    /// Width gained per extend power-up
    pub extend_increment: f32,
    pub extend_max_width: f32,

    // === Ball ===
    pub ball_speed: f32,
    /// Velocity multiplier while power-ball is active
    pub power_ball_multiplier: f32,
    pub power_ball_duration_ms: f64,
    /// Max deflection off the paddle edge (radians, 72°)
    pub paddle_max_angle: f32,
    /// Minimum |vy| as a fraction of speed after a paddle bounce
    pub min_vertical_ratio: f32,
    /// Upper bound on speed for multi-ball spawns
    pub max_ball_speed: f32,

    // === Lasers ===
    pub laser_speed: f32,
    pub laser_cooldown_ms: f64,
    /// Horizontal inset of each laser from the paddle edge
    pub laser_inset: f32,

    // === Power-ups ===
    pub power_up_fall_speed: f32,
    pub power_up_width: f32,
    pub power_up_height: f32,
    pub power_up_drop_chance: f64,

    // === Particles ===
    pub particle_lifespan_ms: f64,
    pub particle_burst: usize,
    pub paddle_particle_burst: usize,
    pub damage_particle_burst: usize,
    pub particle_max_speed: f32,

    // === Scoring ===
    pub score_per_brick: u64,
    pub initial_lives: u8,

    // === Screen shake (frames of jitter) ===
    pub shake_paddle: u32,
    pub shake_brick: u32,
    pub shake_power_up: u32,

    /// Longest frame delta fed to the tick, in ms
    pub max_frame_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            paddle_width: 120.0,
            paddle_speed: 10.0,
            extend_increment: 40.0,
            extend_max_width: 240.0,

            ball_speed: 4.0,
            power_ball_multiplier: 1.2,
            power_ball_duration_ms: 10_000.0,
            paddle_max_angle: std::f32::consts::PI / 2.5,
            min_vertical_ratio: 0.2,
            max_ball_speed: 12.0,

            laser_speed: 10.0,
            laser_cooldown_ms: 200.0,
            laser_inset: 5.0,

            power_up_fall_speed: 1.0,
            power_up_width: 30.0,
            power_up_height: 15.0,
            power_up_drop_chance: 0.2,

            particle_lifespan_ms: 800.0,
            particle_burst: 30,
            paddle_particle_burst: 50,
            damage_particle_burst: 10,
            particle_max_speed: 8.0,

            score_per_brick: 10,
            initial_lives: 3,

            shake_paddle: 5,
            shake_brick: 10,
            shake_power_up: 10,

            max_frame_ms: 100.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be positive, got {}", value),
                })
            }
        }
        fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
            if value >= 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must not be negative, got {}", value),
                })
            }
        }
        fn fraction(field: &'static str, value: f64) -> Result<(), ConfigError> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be within [0, 1], got {}", value),
                })
            }
        }

        positive("paddle_width", self.paddle_width.into())?;
        positive("paddle_speed", self.paddle_speed.into())?;
        non_negative("extend_increment", self.extend_increment.into())?;
        positive("extend_max_width", self.extend_max_width.into())?;
        positive("ball_speed", self.ball_speed.into())?;
        positive("power_ball_multiplier", self.power_ball_multiplier.into())?;
        non_negative("power_ball_duration_ms", self.power_ball_duration_ms)?;
        non_negative("paddle_max_angle", self.paddle_max_angle.into())?;
        fraction("min_vertical_ratio", self.min_vertical_ratio.into())?;
        positive("max_ball_speed", self.max_ball_speed.into())?;
        positive("laser_speed", self.laser_speed.into())?;
        non_negative("laser_cooldown_ms", self.laser_cooldown_ms)?;
        non_negative("laser_inset", self.laser_inset.into())?;
        positive("power_up_fall_speed", self.power_up_fall_speed.into())?;
        positive("power_up_width", self.power_up_width.into())?;
        positive("power_up_height", self.power_up_height.into())?;
        fraction("power_up_drop_chance", self.power_up_drop_chance)?;
        positive("particle_lifespan_ms", self.particle_lifespan_ms)?;
        non_negative("particle_max_speed", self.particle_max_speed.into())?;
        positive("max_frame_ms", self.max_frame_ms)?;

        if self.initial_lives == 0 {
            return Err(ConfigError::Invalid {
                field: "initial_lives",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Read tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read
    Io(std::io::Error),
    /// Config document is not valid JSON for the target type
    Parse(serde_json::Error),
    /// Level table failed validation
    Level(LevelError),
    /// A value parsed but is out of range
    Invalid { field: &'static str, reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Failed to read config: {}", e),
            Self::Parse(e) => write!(f, "Invalid config: {}", e),
            Self::Level(e) => write!(f, "Invalid level table: {}", e),
            Self::Invalid { field, reason } => write!(f, "Invalid `{}`: {}", field, reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Level(e) => Some(e),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<LevelError> for ConfigError {
    fn from(e: LevelError) -> Self {
        Self::Level(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "ball_speed": 6.0, "initial_lives": 5 }"#).unwrap();
        assert_eq!(tuning.ball_speed, 6.0);
        assert_eq!(tuning.initial_lives, 5);
        assert_eq!(tuning.paddle_width, Tuning::default().paddle_width);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Tuning::load("/definitely/not/here/tuning.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_drop_chance_rejected() {
        let err = Tuning::from_json(r#"{ "power_up_drop_chance": 1.5 }"#).unwrap_err();
        match err {
            ConfigError::Invalid { field, .. } => assert_eq!(field, "power_up_drop_chance"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_non_positive_values_rejected() {
        for json in [
            r#"{ "particle_lifespan_ms": 0.0 }"#,
            r#"{ "max_frame_ms": -5.0 }"#,
            r#"{ "paddle_width": 0.0 }"#,
            r#"{ "ball_speed": -4.0 }"#,
            r#"{ "initial_lives": 0 }"#,
        ] {
            let err = Tuning::from_json(json).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { .. }), "{}", json);
        }
    }
}
