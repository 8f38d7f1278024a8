//! In-memory backend for unit tests

use glam::Vec3;
use hover_core::{
    Carrier, CarrierFrame, ForceMode, GroundProbe, LayerMask, PhysicsBody, ProbeHit,
};

/// Records every call; impulses change velocity immediately (unit mass),
/// accelerations are only recorded.
#[derive(Debug, Default)]
pub(crate) struct TestBackend {
    pub velocity: Vec3,
    pub position: Vec3,
    pub forces: Vec<(Vec3, ForceMode)>,
    pub ground: Option<ProbeHit>,
    pub reparents: Vec<Carrier>,
}

impl PhysicsBody for TestBackend {
    fn linear_velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn apply_force(&mut self, force: Vec3, mode: ForceMode) {
        if mode == ForceMode::Impulse {
            self.velocity += force;
        }
        self.forces.push((force, mode));
    }
}

impl GroundProbe for TestBackend {
    fn collider_position(&self) -> Vec3 {
        self.position
    }

    fn cast_ray(
        &self,
        _origin: Vec3,
        _direction: Vec3,
        max_distance: f32,
        _mask: LayerMask,
    ) -> Option<ProbeHit> {
        self.ground.filter(|hit| hit.distance <= max_distance)
    }
}

impl CarrierFrame for TestBackend {
    fn reparent(&mut self, carrier: Carrier) {
        self.reparents.push(carrier);
    }
}
