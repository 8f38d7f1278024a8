//! Sandbox settings with persistence
//!
//! Settings are read from `~/.config/hover/sandbox.toml`

use std::fs;
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use glam::Vec3;
use hover_controller::ControllerConfig;
use hover_core::TimeConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::scene::{ActorInput, ScriptStep};

/// All sandbox settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxSettings {
    pub time: TimeConfig,
    pub controller: ControllerConfig,
    pub scene: SceneSettings,
}

impl Default for SandboxSettings {
    fn default() -> Self {
        // Stiffer ride spring than the controller's defaults so the capsule
        // settles within a second
        let mut controller = ControllerConfig::default();
        controller.floating.floating_offset = 0.3;
        controller.floating.ride_spring_strength = 200.0;
        controller.floating.ride_spring_damper = 20.0;

        Self {
            time: TimeConfig::default(),
            controller,
            scene: SceneSettings::default(),
        }
    }
}

impl SandboxSettings {
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("hover"))
    }

    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("sandbox.toml"))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No sandbox settings found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(settings) => {
                    info!("Loaded sandbox settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Invalid sandbox settings: {:#}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read sandbox settings: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Parse and validate settings
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Self = toml::from_str(content)
            .context("Failed to parse sandbox settings")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject timings the frame loop cannot make progress with
    pub fn validate(&self) -> Result<()> {
        let time = &self.time;
        ensure!(
            time.fixed_timestep.is_finite() && time.fixed_timestep > 0.0,
            "time.fixed_timestep must be positive, got {}",
            time.fixed_timestep
        );
        ensure!(
            time.max_delta_time.is_finite() && time.max_delta_time > 0.0,
            "time.max_delta_time must be positive, got {}",
            time.max_delta_time
        );
        ensure!(
            time.time_scale.is_finite() && time.time_scale >= 0.0,
            "time.time_scale must be non-negative, got {}",
            time.time_scale
        );

        let scene = &self.scene;
        ensure!(
            scene.frame_time.is_finite() && scene.frame_time > 0.0,
            "scene.frame_time must be positive, got {}",
            scene.frame_time
        );
        ensure!(
            scene.duration.is_finite() && scene.duration >= 0.0,
            "scene.duration must be non-negative, got {}",
            scene.duration
        );

        self.controller
            .validate()
            .context("Invalid controller settings")?;
        Ok(())
    }
}

/// What the sandbox builds and how long it runs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Simulated seconds to run
    pub duration: f32,
    /// Simulated frame length fed to the fixed-step accumulator
    pub frame_time: f32,
    /// Where the character's feet start
    pub spawn: Vec3,
    pub platform_half_extents: Vec3,
    pub platform_start: Vec3,
    pub platform_end: Vec3,
    /// Seconds per platform leg
    pub platform_duration: f32,
    /// Scripted inputs for the actor
    pub script: Vec<ScriptStep>,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            duration: 8.0,
            frame_time: 1.0 / 60.0,
            spawn: Vec3::new(0.0, 0.5, 0.0),
            platform_half_extents: Vec3::new(1.5, 0.25, 1.5),
            platform_start: Vec3::new(6.0, 0.0, 0.0),
            platform_end: Vec3::new(6.0, 0.0, 8.0),
            platform_duration: 3.0,
            script: vec![
                ScriptStep::new(1.0, ActorInput::Move { x: 1.0, z: 0.0 }),
                ScriptStep::new(1.6, ActorInput::JumpPressed),
                ScriptStep::new(1.9, ActorInput::JumpReleased),
                ScriptStep::new(2.4, ActorInput::Stop),
                ScriptStep::new(5.0, ActorInput::JumpPressed),
                ScriptStep::new(5.5, ActorInput::JumpReleased),
            ],
        }
    }
}
