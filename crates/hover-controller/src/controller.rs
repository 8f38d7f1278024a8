//! The floating character controller
//!
//! Owns all per-character state and runs the fixed-tick pipeline:
//! locomotion, then the jump state machine, then the suspension probe, which
//! in turn drives the platform tracker.

use glam::Vec3;
use hover_core::{
    Carrier, CharacterBackend, ColliderGeometry, FixedClock, PlatformId, SurfaceId,
};
use tracing::{debug, error, info};

use crate::config::ControllerConfig;
use crate::error::AttachError;
use crate::jump::{JumpState, JumpStateMachine};
use crate::locomotion::LocomotionSolver;
use crate::platform::PlatformTracker;
use crate::suspension::{ProbeReport, SuspensionProbe};

/// Floating rigidbody character controller
#[derive(Debug)]
pub struct FloatingController {
    config: ControllerConfig,
    enabled: bool,
    clock: FixedClock,
    locomotion: LocomotionSolver,
    jump: JumpStateMachine,
    suspension: SuspensionProbe,
    platform: PlatformTracker,
}

impl FloatingController {
    /// Attach to a character, failing on a bad config or missing collider
    pub fn try_attach(
        config: ControllerConfig,
        geometry: Option<ColliderGeometry>,
    ) -> Result<Self, AttachError> {
        config.validate()?;
        let geometry = geometry.ok_or(AttachError::MissingCollider)?;
        if !geometry.local_offset.is_finite() || !geometry.center_offset.is_finite() {
            return Err(AttachError::InvalidGeometry(
                geometry.local_offset,
                geometry.center_offset,
            ));
        }

        let rest_height = geometry.rest_height(config.floating.floating_offset);
        let probe_length = rest_height + config.floating.needle_length;
        info!(rest_height, probe_length, "Floating controller attached");

        Ok(Self::build(
            config,
            true,
            SuspensionProbe::new(rest_height, probe_length, geometry.center_offset),
        ))
    }

    /// Attach to a character.
    ///
    /// On failure the error is logged once and the returned controller is
    /// disabled: every tick is a no-op and jump requests are refused.
    pub fn attach(config: ControllerConfig, geometry: Option<ColliderGeometry>) -> Self {
        match Self::try_attach(config.clone(), geometry) {
            Ok(controller) => controller,
            Err(e) => {
                error!("Floating controller disabled: {}", e);
                Self::build(config, false, SuspensionProbe::new(0.0, 0.0, 0.0))
            }
        }
    }

    fn build(config: ControllerConfig, enabled: bool, suspension: SuspensionProbe) -> Self {
        Self {
            locomotion: LocomotionSolver::new(config.locomotion.max_speed),
            config,
            enabled,
            clock: FixedClock::new(),
            jump: JumpStateMachine::new(),
            suspension,
            platform: PlatformTracker::new(),
        }
    }

    /// Run one fixed physics tick
    pub fn tick<B: CharacterBackend + ?Sized>(&mut self, backend: &mut B, dt: f32) {
        if !self.enabled {
            return;
        }
        if !dt.is_finite() || dt < 0.0 {
            debug!(dt, "skipping tick with invalid delta");
            return;
        }

        self.clock.advance(dt);
        let now = self.clock.now();
        let config = &self.config;
        let gravity = config.locomotion.gravity;
        let grounded = self.suspension.is_grounded();

        self.locomotion
            .solve(backend, &config.locomotion, grounded, self.jump.state(), dt);
        self.jump
            .evaluate(backend, &config.jump, gravity, grounded, now);

        let report = self.suspension.update(
            backend,
            &config.floating,
            &config.jump,
            gravity,
            self.jump.state(),
            dt,
        );
        self.platform
            .refresh(backend, self.suspension.is_grounded(), report.hit.as_ref());
    }

    /// Set the locomotion direction. Zero means no intent.
    pub fn set_forward(&mut self, direction: Vec3) {
        self.locomotion.set_forward(direction);
    }

    /// Try to jump. Returns true if the jump launched; otherwise the request is
    /// remembered for buffering.
    pub fn request_jump(&mut self) -> bool {
        if !self.enabled {
            return false;
        }
        self.jump.request(
            &self.config.jump,
            self.suspension.is_grounded(),
            self.clock.now(),
        )
    }

    /// Release the jump button, shortening the current rise
    pub fn release_jump(&mut self) {
        self.jump.release();
    }

    pub fn can_jump(&self) -> bool {
        self.enabled && self.jump.can_jump(self.suspension.is_grounded())
    }

    /// Override the locomotion speed at runtime. [`Self::config`] reflects it.
    pub fn set_max_speed(&mut self, max_speed: f32) {
        self.config.locomotion.max_speed = max_speed;
        self.locomotion.set_max_speed(max_speed);
    }

    /// Register a callback fired when the probed surface changes
    pub fn on_hit_changed(&mut self, callback: impl FnMut(Option<SurfaceId>) + 'static) {
        self.suspension.on_hit_changed(callback);
    }

    /// Register a callback fired on every jump state change
    pub fn on_jump_state_changed(&mut self, callback: impl FnMut(JumpState) + 'static) {
        self.jump.on_change(callback);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn is_grounded(&self) -> bool {
        self.suspension.is_grounded()
    }

    pub fn jump_state(&self) -> JumpState {
        self.jump.state()
    }

    pub fn is_fast_fall(&self) -> bool {
        self.jump.is_fast_fall()
    }

    pub fn jump_buffering_seconds(&self) -> f32 {
        self.config.jump.buffering_seconds
    }

    pub fn remaining_coyote_time(&self) -> f32 {
        self.suspension.remaining_coyote_time()
    }

    pub fn last_hit(&self) -> Option<SurfaceId> {
        self.suspension.last_hit()
    }

    pub fn last_probe(&self) -> &ProbeReport {
        self.suspension.last_report()
    }

    pub fn current_platform(&self) -> Option<PlatformId> {
        self.platform.current()
    }

    pub fn carrier(&self) -> Carrier {
        self.platform.carrier()
    }

    pub fn max_speed(&self) -> f32 {
        self.locomotion.max_speed()
    }

    pub fn desired_velocity(&self) -> Vec3 {
        self.locomotion.desired_velocity()
    }

    pub fn target_velocity(&self) -> Vec3 {
        self.locomotion.target_velocity()
    }

    pub fn rest_height(&self) -> f32 {
        self.suspension.rest_height()
    }

    pub fn probe_length(&self) -> f32 {
        self.suspension.probe_length()
    }

    /// Clock time of the last tick
    pub fn now(&self) -> f64 {
        self.clock.now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestBackend;
    use hover_core::{ForceMode, ProbeHit};

    fn geometry() -> Option<ColliderGeometry> {
        Some(ColliderGeometry::new(1.0, 0.0))
    }

    fn ground(distance: f32) -> ProbeHit {
        ProbeHit {
            surface: SurfaceId(1),
            distance,
            point: Vec3::ZERO,
            surface_velocity: None,
            platform: None,
        }
    }

    #[test]
    fn test_derived_heights() {
        let mut config = ControllerConfig::default();
        config.floating.floating_offset = 0.25;
        config.floating.needle_length = 0.5;

        let controller =
            FloatingController::try_attach(config, Some(ColliderGeometry::new(0.9, 0.1))).unwrap();
        assert!((controller.rest_height() - 1.25).abs() < 1e-6);
        assert!((controller.probe_length() - 1.75).abs() < 1e-6);
        assert!(controller.is_enabled());
        assert!(controller.is_grounded());
        assert_eq!(controller.jump_state(), JumpState::None);
    }

    #[test]
    fn test_missing_collider_disables() {
        let err = FloatingController::try_attach(ControllerConfig::default(), None).unwrap_err();
        assert!(matches!(err, AttachError::MissingCollider));

        let mut controller = FloatingController::attach(ControllerConfig::default(), None);
        assert!(!controller.is_enabled());

        let mut backend = TestBackend::default();
        controller.set_forward(Vec3::Z);
        controller.tick(&mut backend, 0.02);
        assert!(backend.forces.is_empty());
        assert!(!controller.request_jump());
        assert!(!controller.can_jump());
        assert_eq!(controller.now(), 0.0);
    }

    #[test]
    fn test_invalid_config_disables() {
        let mut config = ControllerConfig::default();
        config.locomotion.max_speed = -1.0;
        let err = FloatingController::try_attach(config.clone(), geometry()).unwrap_err();
        assert!(matches!(err, AttachError::InvalidConfig(_)));
        assert!(!FloatingController::attach(config, geometry()).is_enabled());
    }

    #[test]
    fn test_tick_order_and_forces() {
        let mut controller = FloatingController::attach(ControllerConfig::default(), geometry());
        let mut backend = TestBackend {
            ground: Some(ground(1.0)),
            ..Default::default()
        };

        controller.set_forward(Vec3::Z);
        controller.tick(&mut backend, 0.02);

        // Locomotion then the (zero) ride spring
        assert_eq!(backend.forces.len(), 2);
        assert_eq!(backend.forces[0].1, ForceMode::Acceleration);
        assert!(backend.forces[0].0.z > 0.0);
        assert_eq!(backend.forces[1].0.length(), 0.0);
        assert_eq!(controller.last_hit(), Some(SurfaceId(1)));
    }

    #[test]
    fn test_jump_launches_on_next_tick() {
        let mut controller = FloatingController::attach(ControllerConfig::default(), geometry());
        let mut backend = TestBackend {
            ground: Some(ground(1.0)),
            ..Default::default()
        };
        controller.tick(&mut backend, 0.02);

        assert!(controller.can_jump());
        assert!(controller.request_jump());
        assert_eq!(controller.jump_state(), JumpState::Launch);
        assert!(!controller.can_jump());

        backend.forces.clear();
        controller.tick(&mut backend, 0.02);
        assert_eq!(controller.jump_state(), JumpState::Rise);
        assert_eq!(backend.velocity.y, 15.0);
        // Impulse only; the spring stays out of the way while rising
        assert_eq!(
            backend.forces,
            vec![(Vec3::new(0.0, 15.0, 0.0), ForceMode::Impulse)]
        );
    }

    #[test]
    fn test_set_max_speed_and_buffering_window() {
        let mut controller = FloatingController::attach(ControllerConfig::default(), geometry());
        controller.set_max_speed(3.0);
        controller.set_forward(Vec3::X);
        assert_eq!(controller.max_speed(), 3.0);
        assert_eq!(controller.config().locomotion.max_speed, 3.0);
        assert_eq!(controller.target_velocity(), Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(controller.jump_buffering_seconds(), 0.125);
    }

    #[test]
    fn test_invalid_delta_is_skipped() {
        let mut controller = FloatingController::attach(ControllerConfig::default(), geometry());
        let mut backend = TestBackend::default();
        controller.tick(&mut backend, f32::NAN);
        controller.tick(&mut backend, -0.02);
        assert!(backend.forces.is_empty());
        assert_eq!(controller.now(), 0.0);
    }
}
