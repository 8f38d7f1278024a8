//! Jump state machine
//!
//! ```text
//! None --request--> Launch --(same tick)--> Rise --vy<=0, airborne--> Fall
//!                                             |                        |
//!                                             +--vy<=0, grounded--> Landing <--+
//!                                                                      |
//! None <--------------------(next evaluation)--------------------------+
//! ```
//!
//! Rise and Fall add extra gravity on top of whatever the host applies; an
//! early release during Rise doubles it for a shorter arc. A request that
//! arrives while the jump cannot start is remembered and honored on the way
//! back into None if it is recent enough.

use glam::Vec3;
use hover_core::{ForceMode, PhysicsBody};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::JumpConfig;
use crate::events::Listeners;

/// Phase of the jump lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JumpState {
    #[default]
    None,
    Launch,
    Rise,
    Fall,
    Landing,
}

impl JumpState {
    /// Whether a jump is in progress
    pub fn is_active(self) -> bool {
        self != JumpState::None
    }

    /// Whether the body is in free flight. Ground forces must not touch it.
    pub fn is_ballistic(self) -> bool {
        matches!(self, JumpState::Launch | JumpState::Rise | JumpState::Fall)
    }
}

#[derive(Debug, Default)]
pub struct JumpStateMachine {
    state: JumpState,
    fast_fall: bool,
    last_request: Option<f64>,
    listeners: Listeners<JumpState>,
}

impl JumpStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> JumpState {
        self.state
    }

    pub fn is_fast_fall(&self) -> bool {
        self.fast_fall
    }

    /// Clock time of the last request that could not launch immediately
    pub fn last_request(&self) -> Option<f64> {
        self.last_request
    }

    /// Register a callback fired on every state change
    pub fn on_change(&mut self, callback: impl FnMut(JumpState) + 'static) {
        self.listeners.subscribe(callback);
    }

    pub fn can_jump(&self, grounded: bool) -> bool {
        grounded && self.state == JumpState::None
    }

    /// Start a jump if possible, otherwise remember the request time.
    ///
    /// Returns true if the jump launched.
    pub fn request(&mut self, config: &JumpConfig, grounded: bool, now: f64) -> bool {
        if !self.can_jump(grounded) {
            self.last_request = Some(now);
            return false;
        }

        self.transition(JumpState::Launch, config, grounded, now);
        true
    }

    /// Cut the current rise short
    pub fn release(&mut self) {
        if self.state == JumpState::Rise {
            self.fast_fall = true;
        }
    }

    /// Run one tick of the state machine against the body
    pub fn evaluate<B: PhysicsBody + ?Sized>(
        &mut self,
        body: &mut B,
        config: &JumpConfig,
        gravity: f32,
        grounded: bool,
        now: f64,
    ) {
        match self.state {
            JumpState::None => {}
            JumpState::Launch => {
                let v = body.linear_velocity();
                body.set_linear_velocity(Vec3::new(v.x, 0.0, v.z));
                body.apply_force(Vec3::Y * config.jump_force_factor, ForceMode::Impulse);
                self.transition(JumpState::Rise, config, grounded, now);
            }
            JumpState::Landing => {
                self.transition(JumpState::None, config, grounded, now);
            }
            JumpState::Rise | JumpState::Fall => {
                let down = Vec3::NEG_Y * gravity;
                if body.linear_velocity().y > 0.0 {
                    let factor = if self.fast_fall { 2.0 } else { 1.0 };
                    body.apply_force(
                        down * config.fall_gravity_factor * factor,
                        ForceMode::Acceleration,
                    );
                } else if grounded {
                    self.transition(JumpState::Landing, config, grounded, now);
                } else {
                    self.transition(JumpState::Fall, config, grounded, now);
                    body.apply_force(down * config.fall_gravity_factor, ForceMode::Acceleration);
                }
            }
        }
    }

    fn transition(&mut self, next: JumpState, config: &JumpConfig, grounded: bool, now: f64) {
        if self.state == next {
            return;
        }

        if next == JumpState::Launch {
            self.fast_fall = false;
        }

        debug!(from = ?self.state, to = ?next, "jump state changed");
        self.state = next;
        self.listeners.emit(next);

        if next == JumpState::None && config.use_buffering {
            self.relaunch_buffered(config, grounded, now);
        }
    }

    fn relaunch_buffered(&mut self, config: &JumpConfig, grounded: bool, now: f64) {
        let Some(requested) = self.last_request else {
            return;
        };
        if now - requested > config.buffering_seconds as f64 || !self.can_jump(grounded) {
            return;
        }

        // A buffered request relaunches at most once
        self.last_request = None;
        debug!(age = now - requested, "honoring buffered jump");
        self.transition(JumpState::Launch, config, grounded, now);
    }
}
