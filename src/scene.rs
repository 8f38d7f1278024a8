//! Scripted scene pieces: a ping-pong platform mover and a scripted actor

use glam::Vec3;
use hover_controller::FloatingController;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Moves back and forth between two points, reversing every `duration` seconds
#[derive(Debug, Clone)]
pub struct PingPongMover {
    start: Vec3,
    end: Vec3,
    duration: f32,
    elapsed: f32,
}

impl PingPongMover {
    pub fn new(start: Vec3, end: Vec3, duration: f32) -> Self {
        Self {
            start,
            end,
            duration,
            elapsed: 0.0,
        }
    }

    /// Advance by `dt` and return the new position
    pub fn advance(&mut self, dt: f32) -> Vec3 {
        self.elapsed += dt;
        self.position()
    }

    pub fn position(&self) -> Vec3 {
        if !(self.duration > 0.0) {
            return self.start;
        }

        let leg = (self.elapsed / self.duration).floor() as u64;
        let (from, to) = if leg % 2 == 1 {
            (self.end, self.start)
        } else {
            (self.start, self.end)
        };
        let t = (self.elapsed % self.duration) / self.duration;
        from.lerp(to, t)
    }
}

/// One scripted input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActorInput {
    /// Hold a direction on the horizontal plane (x right, z forward)
    Move { x: f32, z: f32 },
    Stop,
    JumpPressed,
    JumpReleased,
}

/// An input fired once the script clock reaches `at` seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub at: f32,
    pub input: ActorInput,
}

impl ScriptStep {
    pub fn new(at: f32, input: ActorInput) -> Self {
        Self { at, input }
    }
}

/// Replays a timed input script into a controller
#[derive(Debug, Clone)]
pub struct ScriptedActor {
    script: Vec<ScriptStep>,
    cursor: usize,
    elapsed: f32,
}

impl ScriptedActor {
    pub fn new(mut script: Vec<ScriptStep>) -> Self {
        script.sort_by(|a, b| a.at.total_cmp(&b.at));
        Self {
            script,
            cursor: 0,
            elapsed: 0.0,
        }
    }

    /// Advance the script clock and feed every due input. Returns how many fired.
    pub fn update(&mut self, controller: &mut FloatingController, dt: f32) -> usize {
        self.elapsed += dt;

        let mut fired = 0;
        while let Some(step) = self.script.get(self.cursor) {
            if step.at > self.elapsed {
                break;
            }
            Self::apply(controller, step.input);
            self.cursor += 1;
            fired += 1;
        }
        fired
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.script.len()
    }

    fn apply(controller: &mut FloatingController, input: ActorInput) {
        match input {
            ActorInput::Move { x, z } => {
                controller.set_forward(Vec3::new(x, 0.0, z).normalize_or_zero());
            }
            ActorInput::Stop => controller.set_forward(Vec3::ZERO),
            ActorInput::JumpPressed => {
                let launched = controller.request_jump();
                debug!(launched, "Jump pressed");
            }
            ActorInput::JumpReleased => controller.release_jump(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hover_controller::{ColliderGeometry, ControllerConfig, JumpState};

    fn controller() -> FloatingController {
        FloatingController::attach(
            ControllerConfig::default(),
            Some(ColliderGeometry::new(1.0, 0.0)),
        )
    }

    #[test]
    fn test_ping_pong_reverses() {
        let mut mover = PingPongMover::new(Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0), 2.0);
        assert_eq!(mover.advance(1.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(mover.advance(1.5), Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(mover.advance(1.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(mover.advance(1.0), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ping_pong_zero_duration_stays_put() {
        let mut mover = PingPongMover::new(Vec3::Y, Vec3::X, 0.0);
        assert_eq!(mover.advance(1.0), Vec3::Y);
    }

    #[test]
    fn test_script_fires_in_order() {
        let mut actor = ScriptedActor::new(vec![
            ScriptStep::new(0.5, ActorInput::Stop),
            ScriptStep::new(0.0, ActorInput::Move { x: 3.0, z: 4.0 }),
        ]);
        let mut controller = controller();

        assert_eq!(actor.update(&mut controller, 0.25), 1);
        assert!(
            (controller.target_velocity() - Vec3::new(3.6, 0.0, 4.8)).length() < 1e-4
        );

        assert_eq!(actor.update(&mut controller, 0.25), 1);
        assert_eq!(controller.target_velocity(), Vec3::ZERO);
        assert!(actor.is_finished());
        assert_eq!(actor.update(&mut controller, 1.0), 0);
    }

    #[test]
    fn test_script_jump_press_and_release() {
        let mut actor = ScriptedActor::new(vec![
            ScriptStep::new(0.0, ActorInput::JumpPressed),
            ScriptStep::new(0.1, ActorInput::JumpReleased),
        ]);
        let mut controller = controller();

        assert_eq!(actor.update(&mut controller, 0.0), 1);
        assert_eq!(controller.jump_state(), JumpState::Launch);

        // Releasing before the launch tick has nothing to shorten
        assert_eq!(actor.update(&mut controller, 0.1), 1);
        assert!(!controller.is_fast_fall());
        assert!(actor.is_finished());
    }

    #[test]
    fn test_script_parses_from_toml() {
        #[derive(Deserialize)]
        struct Script {
            script: Vec<ScriptStep>,
        }

        let parsed: Script = toml::from_str(
            r#"
            [[script]]
            at = 1.0
            input = { action = "move", x = 1.0, z = 0.0 }

            [[script]]
            at = 2.0
            input = { action = "jump_pressed" }
            "#,
        )
        .unwrap();

        assert_eq!(
            parsed.script,
            vec![
                ScriptStep::new(1.0, ActorInput::Move { x: 1.0, z: 0.0 }),
                ScriptStep::new(2.0, ActorInput::JumpPressed),
            ]
        );
    }
}
