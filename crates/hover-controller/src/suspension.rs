//! Ground probe and ride spring
//!
//! A single ray is cast straight down from the collider's vertical center.
//! While it hits, a spring-damper holds the character at its rest height,
//! measured against the velocity of whatever it stands on. When it misses, a
//! coyote window keeps the character grounded for jump purposes before it
//! starts falling.

use glam::Vec3;
use hover_core::{CharacterBackend, ForceMode, ProbeHit, SurfaceId};
use tracing::debug;

use crate::config::{FloatingConfig, JumpConfig};
use crate::events::ChangeNotifier;
use crate::jump::JumpState;

/// What happened on the last probe, kept for debug drawing
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProbeReport {
    /// Where the ray started
    pub origin: Vec3,
    pub hit: Option<ProbeHit>,
    /// Spring acceleration along the down direction, if it was applied
    pub spring_force: Option<f32>,
    /// The ray missed but the coyote window was still open
    pub coyote: bool,
}

/// Spring-damper acceleration along the down direction.
///
/// Positive values push the body down, toward the surface.
pub fn spring_force(
    distance: f32,
    rest_height: f32,
    body_velocity: Vec3,
    surface_velocity: Vec3,
    strength: f32,
    damper: f32,
) -> f32 {
    let down = Vec3::NEG_Y;
    let relative_velocity = down.dot(body_velocity) - down.dot(surface_velocity);
    let x = distance - rest_height;
    x * strength - relative_velocity * damper
}

#[derive(Debug)]
pub struct SuspensionProbe {
    rest_height: f32,
    probe_length: f32,
    center_offset: f32,
    grounded: bool,
    remaining_coyote_time: f32,
    hit: ChangeNotifier<Option<SurfaceId>>,
    last_report: ProbeReport,
}

impl SuspensionProbe {
    /// Starts grounded with a closed coyote window
    pub fn new(rest_height: f32, probe_length: f32, center_offset: f32) -> Self {
        Self {
            rest_height,
            probe_length,
            center_offset,
            grounded: true,
            remaining_coyote_time: 0.0,
            hit: ChangeNotifier::new(None),
            last_report: ProbeReport::default(),
        }
    }

    pub fn rest_height(&self) -> f32 {
        self.rest_height
    }

    pub fn probe_length(&self) -> f32 {
        self.probe_length
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn remaining_coyote_time(&self) -> f32 {
        self.remaining_coyote_time
    }

    /// The surface most recently reported to hit listeners
    pub fn last_hit(&self) -> Option<SurfaceId> {
        self.hit.current()
    }

    pub fn last_report(&self) -> &ProbeReport {
        &self.last_report
    }

    /// Register a callback fired when the probed surface changes
    pub fn on_hit_changed(&mut self, callback: impl FnMut(Option<SurfaceId>) + 'static) {
        self.hit.subscribe(callback);
    }

    /// Cast the probe and apply the ride spring or fall gravity
    pub fn update<B: CharacterBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        floating: &FloatingConfig,
        jump: &JumpConfig,
        gravity: f32,
        jump_state: JumpState,
        dt: f32,
    ) -> ProbeReport {
        let origin = backend.collider_position() + Vec3::Y * self.center_offset;
        let hit = backend.cast_ray(
            origin,
            Vec3::NEG_Y,
            self.probe_length,
            floating.ground_layers,
        );

        let mut report = ProbeReport {
            origin,
            hit,
            ..Default::default()
        };

        match hit {
            Some(hit) => {
                if !self.grounded {
                    self.grounded = true;
                    self.remaining_coyote_time = jump.coyote_time;
                }
                self.report_hit(Some(hit.surface));

                if !jump_state.is_ballistic() {
                    let force = spring_force(
                        hit.distance,
                        self.rest_height,
                        backend.linear_velocity(),
                        hit.surface_velocity.unwrap_or(Vec3::ZERO),
                        floating.ride_spring_strength,
                        floating.ride_spring_damper,
                    );
                    backend.apply_force(Vec3::NEG_Y * force, ForceMode::Acceleration);
                    report.spring_force = Some(force);
                }
            }
            None if self.remaining_coyote_time > 0.0 => {
                self.remaining_coyote_time -= dt;
                report.coyote = true;
            }
            None => {
                self.grounded = false;
                self.report_hit(None);

                if !jump_state.is_ballistic() {
                    let down = -gravity * jump.fall_gravity_factor;
                    backend.apply_force(Vec3::new(0.0, down, 0.0), ForceMode::Acceleration);
                }
            }
        }

        self.last_report = report;
        report
    }

    fn report_hit(&mut self, surface: Option<SurfaceId>) {
        if self.hit.report(surface) {
            debug!(?surface, "probed surface changed");
        }
    }
}
