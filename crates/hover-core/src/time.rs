//! Time keeping for fixed-timestep simulation
//!
//! [`GameTime`] turns variable frame deltas into a number of fixed physics
//! steps. [`FixedClock`] is the monotonic tick clock a controller reads its
//! timers against.

use serde::{Deserialize, Serialize};

/// Configuration for game time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// How many simulated seconds pass per real second
    pub time_scale: f32,
    /// Fixed timestep for physics (in seconds)
    pub fixed_timestep: f32,
    /// Maximum delta time to prevent spiral of death
    pub max_delta_time: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            fixed_timestep: 1.0 / 50.0,
            max_delta_time: 0.25,
        }
    }
}

/// Frame time tracking with a fixed-step accumulator
#[derive(Debug, Clone)]
pub struct GameTime {
    /// Configuration
    pub config: TimeConfig,
    /// Time since start in seconds
    pub total_time: f64,
    /// Delta time for this frame (clamped)
    pub delta_time: f32,
    /// Unscaled delta time
    pub unscaled_delta_time: f32,
    /// Frame counter
    pub frame_count: u64,
    /// Accumulated time for fixed timestep
    fixed_accumulator: f32,
}

impl Default for GameTime {
    fn default() -> Self {
        Self {
            config: TimeConfig::default(),
            total_time: 0.0,
            delta_time: 0.0,
            unscaled_delta_time: 0.0,
            frame_count: 0,
            fixed_accumulator: 0.0,
        }
    }
}

impl GameTime {
    /// Create a new game time with custom config
    pub fn new(config: TimeConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Update the game time with the raw delta from the previous frame
    pub fn update(&mut self, raw_delta: f32) {
        self.unscaled_delta_time = raw_delta.min(self.config.max_delta_time);
        self.frame_count += 1;
        self.delta_time = self.unscaled_delta_time * self.config.time_scale;
        self.total_time += self.delta_time as f64;
        self.fixed_accumulator += self.delta_time;
    }

    /// Get the number of fixed timesteps to process this frame
    ///
    /// A non-positive timestep yields no steps.
    pub fn fixed_steps(&mut self) -> u32 {
        if self.config.fixed_timestep.is_nan() || self.config.fixed_timestep <= 0.0 {
            return 0;
        }
        let mut steps = 0;
        while self.fixed_accumulator >= self.config.fixed_timestep {
            self.fixed_accumulator -= self.config.fixed_timestep;
            steps += 1;
        }
        steps
    }
}

/// Monotonic clock advanced once per physics tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedClock {
    elapsed: f64,
    ticks: u64,
}

impl FixedClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one tick of length `dt`
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt as f64;
        self.ticks += 1;
    }

    /// Seconds accumulated over all ticks so far
    pub fn now(&self) -> f64 {
        self.elapsed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Seconds elapsed since `instant`
    pub fn since(&self, instant: f64) -> f64 {
        self.elapsed - instant
    }
}
