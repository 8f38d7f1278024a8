//! Controller configuration
//!
//! Tunables are grouped the way they are authored: locomotion, floating and
//! jump. Every section has defaults, so a partial TOML file only needs to name
//! the values it overrides.

use std::fs;
use std::path::Path;

use hover_core::{Curve, LayerMask};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ConfigError;

/// Planar movement tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Target planar speed in meters per second
    pub max_speed: f32,
    /// How fast the desired velocity moves toward the target (m/s²)
    pub acceleration: f32,
    /// Upper bound on the steering acceleration applied to the body
    pub max_accel_force: f32,
    /// Base gravity the controller applies itself
    pub gravity: f32,
    /// Scales `acceleration` by the alignment between input and current velocity
    pub acceleration_curve: Curve,
    /// Scales `max_accel_force` by the same alignment
    pub max_accel_force_curve: Curve,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            max_speed: 6.0,
            acceleration: 100.0,
            max_accel_force: 75.0,
            gravity: 10.0,
            acceleration_curve: Curve::default(),
            max_accel_force_curve: Curve::default(),
        }
    }
}

/// Suspension tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloatingConfig {
    /// Layers the ground probe may hit
    pub ground_layers: LayerMask,
    /// Extra hover height on top of the collider geometry
    pub floating_offset: f32,
    /// How far past the rest height the probe still finds ground
    pub needle_length: f32,
    pub ride_spring_strength: f32,
    pub ride_spring_damper: f32,
}

impl Default for FloatingConfig {
    fn default() -> Self {
        Self {
            ground_layers: LayerMask::ALL,
            floating_offset: 0.0,
            needle_length: 0.5,
            ride_spring_strength: 1.0,
            ride_spring_damper: 1.0,
        }
    }
}

/// Jump tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    /// Upward impulse applied on launch
    pub jump_force_factor: f32,
    /// Gravity multiplier while rising and falling
    pub fall_gravity_factor: f32,
    /// Seconds after losing the ground during which a jump is still allowed
    pub coyote_time: f32,
    pub use_buffering: bool,
    /// Seconds before landing during which a jump request is remembered
    pub buffering_seconds: f32,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            jump_force_factor: 15.0,
            fall_gravity_factor: 5.0,
            coyote_time: 0.25,
            use_buffering: true,
            buffering_seconds: 0.125,
        }
    }
}

/// All tunables of a floating controller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub locomotion: LocomotionConfig,
    pub floating: FloatingConfig,
    pub jump: JumpConfig,
}

impl ControllerConfig {
    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&content)
    }

    /// Load a config file, or return defaults if it is missing or invalid
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No controller config at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::from_path(path) {
            Ok(config) => {
                info!("Loaded controller config from {:?}", path);
                config
            }
            Err(e) => {
                warn!("Failed to load controller config: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Serialize to pretty TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check that every tunable is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let l = &self.locomotion;
        let f = &self.floating;
        let j = &self.jump;

        non_negative("locomotion.max_speed", l.max_speed)?;
        non_negative("locomotion.acceleration", l.acceleration)?;
        non_negative("locomotion.max_accel_force", l.max_accel_force)?;
        non_negative("locomotion.gravity", l.gravity)?;
        finite("floating.floating_offset", f.floating_offset)?;
        non_negative("floating.needle_length", f.needle_length)?;
        non_negative("floating.ride_spring_strength", f.ride_spring_strength)?;
        non_negative("floating.ride_spring_damper", f.ride_spring_damper)?;
        non_negative("jump.jump_force_factor", j.jump_force_factor)?;
        non_negative("jump.fall_gravity_factor", j.fall_gravity_factor)?;
        non_negative("jump.coyote_time", j.coyote_time)?;
        non_negative("jump.buffering_seconds", j.buffering_seconds)?;
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}
