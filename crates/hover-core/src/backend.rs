//! Collaborator contracts.
//!
//! The controller never talks to a physics engine directly. A hosting engine
//! implements these traits for the character it simulates, which lets the
//! same controller run against rapier3d, another engine, or a scripted test
//! double.

use glam::Vec3;

use crate::types::{LayerMask, MirrorId, PlatformId, SurfaceId};

/// How a force passed to [`PhysicsBody::apply_force`] is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForceMode {
    /// Instantaneous change in momentum, scaled by the body's mass
    Impulse,
    /// Continuous acceleration over the current physics step, independent of mass
    Acceleration,
}

/// The rigid platform capability of a probed surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformInfo {
    /// Identity of the platform
    pub id: PlatformId,
    /// The mirror transform a character riding this platform is parented under
    pub mirror: MirrorId,
}

/// Result of a successful ground probe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    /// Identity of the surface that was hit
    pub surface: SurfaceId,
    /// Distance from the ray origin to the hit point
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
    /// Linear velocity of the surface's physics body, if it has one
    pub surface_velocity: Option<Vec3>,
    /// Platform capability of the surface, if it has one
    pub platform: Option<PlatformInfo>,
}

/// What a character's carrying frame is parented under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Carrier {
    /// The holder the character had when it was attached
    #[default]
    Origin,
    /// A platform's mirror transform
    Mirror(MirrorId),
}

/// The character's physics body.
///
/// Exclusively owned by the hosting engine; the controller only borrows it for
/// the duration of a tick.
pub trait PhysicsBody {
    /// Current linear velocity
    fn linear_velocity(&self) -> Vec3;

    /// Overwrite the linear velocity
    fn set_linear_velocity(&mut self, velocity: Vec3);

    /// Apply a force in the given mode.
    ///
    /// [`ForceMode::Acceleration`] must only last for the current physics step.
    fn apply_force(&mut self, force: Vec3, mode: ForceMode);
}

/// Ray query against the ground.
pub trait GroundProbe {
    /// World position of the character's collider transform.
    ///
    /// The probe origin is this position raised by the collider's center offset.
    fn collider_position(&self) -> Vec3;

    /// Cast a ray and return the closest hit on a layer selected by `mask`.
    ///
    /// The character's own colliders must never be reported.
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<ProbeHit>;
}

/// The frame the character is parented under.
pub trait CarrierFrame {
    /// Reparent the character's carrying frame.
    ///
    /// Called only when the carrier actually changes.
    fn reparent(&mut self, carrier: Carrier);
}

/// Everything a floating controller needs from its host for one tick.
pub trait CharacterBackend: PhysicsBody + GroundProbe + CarrierFrame {}

impl<T: PhysicsBody + GroundProbe + CarrierFrame> CharacterBackend for T {}
