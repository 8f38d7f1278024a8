//! Planar locomotion
//!
//! The solver keeps a desired planar velocity that chases `forward * max_speed`
//! at a bounded rate, then pushes the body toward it with a clamped
//! acceleration. Both rates are shaped by response curves sampled with the
//! alignment between the input direction and the current desired velocity.

use glam::Vec3;
use hover_core::{ForceMode, PhysicsBody};

use crate::config::LocomotionConfig;
use crate::jump::JumpState;

/// Tick deltas below this skip the force computation entirely
pub const MIN_TICK_DELTA: f32 = 1e-6;

/// Steers the body's planar velocity toward the input direction
#[derive(Debug, Clone)]
pub struct LocomotionSolver {
    forward: Vec3,
    desired_velocity: Vec3,
    max_speed: f32,
}

impl LocomotionSolver {
    pub fn new(max_speed: f32) -> Self {
        Self {
            forward: Vec3::ZERO,
            desired_velocity: Vec3::ZERO,
            max_speed,
        }
    }

    /// Set the input direction. Zero means no locomotion intent.
    pub fn set_forward(&mut self, forward: Vec3) {
        self.forward = forward;
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn set_max_speed(&mut self, max_speed: f32) {
        self.max_speed = max_speed;
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// The planar velocity the solver is currently steering toward
    pub fn desired_velocity(&self) -> Vec3 {
        self.desired_velocity
    }

    /// Where `desired_velocity` is heading
    pub fn target_velocity(&self) -> Vec3 {
        planar(self.forward) * self.max_speed
    }

    /// Alignment between the input and the current desired velocity, zero when
    /// the desired velocity is zero
    pub fn alignment(&self) -> f32 {
        planar(self.forward).dot(self.desired_velocity.normalize_or_zero())
    }

    /// Advance the desired velocity and apply the steering acceleration.
    ///
    /// Returns the acceleration applied to the body, if any.
    pub fn solve<B: PhysicsBody + ?Sized>(
        &mut self,
        body: &mut B,
        config: &LocomotionConfig,
        grounded: bool,
        jump: JumpState,
        dt: f32,
    ) -> Option<Vec3> {
        if !dt.is_finite() || dt < MIN_TICK_DELTA {
            return None;
        }

        let vel_dot = self.alignment();
        let accel = config.acceleration * config.acceleration_curve.evaluate(vel_dot);
        self.desired_velocity =
            move_towards(self.desired_velocity, self.target_velocity(), accel * dt);

        // Leave vertical motion to gravity and the jump while not standing
        let mut current = body.linear_velocity();
        if !grounded || jump.is_ballistic() {
            current.y = 0.0;
        }

        let max_accel =
            (config.max_accel_force * config.max_accel_force_curve.evaluate(vel_dot)).max(0.0);
        let force = ((self.desired_velocity - current) / dt).clamp_length_max(max_accel);

        if force == Vec3::ZERO {
            return None;
        }
        body.apply_force(force, ForceMode::Acceleration);
        Some(force)
    }
}

fn planar(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Move a vector towards a target by a maximum delta
fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let diff = target - current;
    let distance = diff.length();

    if distance <= max_delta || distance == 0.0 {
        target
    } else {
        current + diff / distance * max_delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestBackend;
    use hover_core::Curve;

    #[test]
    fn test_move_towards() {
        let result = move_towards(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 5.0);
        assert!((result.x - 5.0).abs() < 0.001);

        let result = move_towards(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), 5.0);
        assert_eq!(result, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_reaches_max_speed_without_overshoot() {
        let config = LocomotionConfig::default();
        let mut solver = LocomotionSolver::new(config.max_speed);
        let mut body = TestBackend::default();
        solver.set_forward(Vec3::Z);

        let mut reached_at = None;
        for tick in 0..10 {
            solver.solve(&mut body, &config, true, JumpState::None, 0.02);
            assert!(solver.desired_velocity().z <= 6.0);
            if reached_at.is_none() && solver.desired_velocity().z == 6.0 {
                reached_at = Some(tick);
            }
        }

        // 100 m/s² * 0.02 s = 2 m/s per tick, so three ticks
        assert_eq!(reached_at, Some(2));
    }

    #[test]
    fn test_zero_input_decelerates() {
        let config = LocomotionConfig::default();
        let mut solver = LocomotionSolver::new(config.max_speed);
        let mut body = TestBackend::default();

        solver.set_forward(Vec3::X);
        for _ in 0..5 {
            solver.solve(&mut body, &config, true, JumpState::None, 0.02);
        }
        assert_eq!(solver.desired_velocity(), Vec3::new(6.0, 0.0, 0.0));

        solver.set_forward(Vec3::ZERO);
        let mut ticks = 0;
        while solver.desired_velocity() != Vec3::ZERO {
            solver.solve(&mut body, &config, true, JumpState::None, 0.02);
            ticks += 1;
            assert!(ticks <= 3);
        }
        assert_eq!(ticks, 3);
    }

    #[test]
    fn test_force_is_clamped() {
        let config = LocomotionConfig::default();
        let mut solver = LocomotionSolver::new(config.max_speed);
        let mut body = TestBackend::default();
        solver.set_forward(Vec3::Z);

        let force = solver
            .solve(&mut body, &config, true, JumpState::None, 0.02)
            .unwrap();
        // (2 - 0) / 0.02 = 100, clamped to 75
        assert!((force.length() - 75.0).abs() < 1e-3);
        assert_eq!(body.forces, vec![(force, ForceMode::Acceleration)]);
    }

    #[test]
    fn test_curves_scale_rates() {
        let config = LocomotionConfig {
            acceleration_curve: Curve::linear(2.0, 1.0),
            max_accel_force_curve: Curve::linear(4.0, 1.0),
            ..Default::default()
        };
        let mut solver = LocomotionSolver::new(config.max_speed);
        let mut body = TestBackend::default();

        solver.set_forward(Vec3::Z);
        for _ in 0..3 {
            solver.solve(&mut body, &config, true, JumpState::None, 0.02);
        }
        assert_eq!(solver.desired_velocity().z, 6.0);

        // Reversing gives alignment -1: twice the acceleration
        solver.set_forward(Vec3::NEG_Z);
        assert_eq!(solver.alignment(), -1.0);
        solver.solve(&mut body, &config, true, JumpState::None, 0.02);
        assert!((solver.desired_velocity().z - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_vertical_velocity_ignored_while_airborne() {
        let config = LocomotionConfig::default();
        let mut solver = LocomotionSolver::new(config.max_speed);
        let mut body = TestBackend {
            velocity: Vec3::new(0.0, -3.0, 0.0),
            ..Default::default()
        };

        // Airborne, no input: nothing to correct on the plane
        assert_eq!(
            solver.solve(&mut body, &config, false, JumpState::None, 0.02),
            None
        );
        // Rising: same
        assert_eq!(
            solver.solve(&mut body, &config, true, JumpState::Rise, 0.02),
            None
        );

        // Grounded and idle: the solver damps vertical drift too
        let force = solver
            .solve(&mut body, &config, true, JumpState::Landing, 0.02)
            .unwrap();
        assert!(force.y > 0.0);
    }

    #[test]
    fn test_tiny_delta_short_circuits() {
        let config = LocomotionConfig::default();
        let mut solver = LocomotionSolver::new(config.max_speed);
        let mut body = TestBackend::default();
        solver.set_forward(Vec3::Z);

        assert_eq!(
            solver.solve(&mut body, &config, true, JumpState::None, 0.0),
            None
        );
        assert_eq!(
            solver.solve(&mut body, &config, true, JumpState::None, f32::NAN),
            None
        );
        assert!(body.forces.is_empty());
        assert_eq!(solver.desired_velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_input_is_flattened() {
        let mut solver = LocomotionSolver::new(6.0);
        solver.set_forward(Vec3::new(0.0, 1.0, 1.0));
        assert_eq!(solver.target_velocity(), Vec3::new(0.0, 0.0, 6.0));
        assert_eq!(solver.forward(), Vec3::new(0.0, 1.0, 1.0));
    }

    #[test]
    fn test_set_max_speed() {
        let config = LocomotionConfig::default();
        let mut solver = LocomotionSolver::new(config.max_speed);
        let mut body = TestBackend::default();
        solver.set_max_speed(2.0);
        solver.set_forward(Vec3::X);

        for _ in 0..3 {
            solver.solve(&mut body, &config, true, JumpState::None, 0.02);
        }
        assert_eq!(solver.desired_velocity(), Vec3::new(2.0, 0.0, 0.0));
    }
}
