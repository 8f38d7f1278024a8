//! Floating character rig.
//!
//! A dynamic capsule with locked rotations and no engine gravity: the
//! controller supplies every vertical force itself. [`CharacterRig::bind`]
//! lends the rig and its world to the controller for one tick as a
//! [`CharacterBody`], which implements the collaborator contracts.

use glam::Vec3;
use hover_core::{
    Carrier, CarrierFrame, ColliderGeometry, ForceMode, GroundProbe, LayerMask, PhysicsBody,
    ProbeHit,
};
use rapier3d::prelude::*;
use tracing::{debug, info};

use crate::{from_vector, to_vector, PhysicsWorld};

/// Capsule rig configuration
#[derive(Debug, Clone)]
pub struct RigConfig {
    /// Capsule height (default: 1.8m)
    pub height: f32,
    /// Capsule radius (default: 0.4m)
    pub radius: f32,
    /// Body mass in kilograms (default: 1.0)
    pub mass: f32,
    /// Collision layers the capsule belongs to
    pub layers: LayerMask,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            height: 1.8,
            radius: 0.4,
            mass: 1.0,
            layers: LayerMask::ALL,
        }
    }
}

/// A character's body and collider in a [`PhysicsWorld`]
#[derive(Debug)]
pub struct CharacterRig {
    config: RigConfig,
    body: RigidBodyHandle,
    collider: ColliderHandle,
    carrier: Carrier,
}

impl CharacterRig {
    /// Spawn the rig with its feet at `position`
    pub fn spawn(world: &mut PhysicsWorld, position: Vec3, config: RigConfig) -> Self {
        let half_height = (config.height - 2.0 * config.radius) / 2.0;

        let body = RigidBodyBuilder::dynamic()
            .translation(to_vector(position))
            .lock_rotations()
            .gravity_scale(0.0)
            .can_sleep(false)
            .build();
        let collider = ColliderBuilder::capsule_y(half_height.max(0.01), config.radius)
            .translation(vector![0.0, config.height / 2.0, 0.0])
            .mass(config.mass)
            .friction(0.0)
            .restitution(0.0)
            .collision_groups(InteractionGroups::new(
                Group::from_bits_truncate(config.layers.bits()),
                Group::ALL,
            ))
            .build();

        let (body, collider) = world.add_body(body, collider);
        if let Some(rb) = world.rigid_body_set.get_mut(body) {
            rb.recompute_mass_properties_from_colliders(&world.collider_set);
        }
        info!(
            x = position.x,
            y = position.y,
            z = position.z,
            "Character rig spawned"
        );

        Self {
            config,
            body,
            collider,
            carrier: Carrier::Origin,
        }
    }

    pub fn config(&self) -> &RigConfig {
        &self.config
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn collider(&self) -> ColliderHandle {
        self.collider
    }

    /// What the rig is currently parented under
    pub fn carrier(&self) -> Carrier {
        self.carrier
    }

    /// Collider layout for attaching a controller
    pub fn geometry(&self) -> ColliderGeometry {
        ColliderGeometry::new(self.config.height / 2.0, 0.0)
    }

    /// Feet position
    pub fn position(&self, world: &PhysicsWorld) -> Option<Vec3> {
        world.body_position(self.body)
    }

    pub fn velocity(&self, world: &PhysicsWorld) -> Option<Vec3> {
        world
            .get_rigid_body(self.body)
            .map(|body| from_vector(body.linvel()))
    }

    /// Lend the rig to a controller for one tick.
    ///
    /// Forces from the previous tick are cleared here, so accelerations only
    /// ever last one step.
    pub fn bind<'a>(&'a mut self, world: &'a mut PhysicsWorld) -> CharacterBody<'a> {
        if let Some(body) = world.rigid_body_set.get_mut(self.body) {
            body.reset_forces(true);
        }
        CharacterBody { world, rig: self }
    }

    /// Move the rig along with its mirror's last step. Run after
    /// [`PhysicsWorld::step`]. Returns the displacement applied.
    pub fn follow_carrier(&self, world: &mut PhysicsWorld) -> Option<Vec3> {
        let Carrier::Mirror(id) = self.carrier else {
            return None;
        };
        let mirror = world.mirrors.get(id)?;
        let body = world.rigid_body_set.get_mut(self.body)?;

        let from = from_vector(body.translation());
        let to = mirror.carry(from);
        let delta = to - from;
        if delta != Vec3::ZERO {
            body.set_translation(to_vector(to), true);
        }
        Some(delta)
    }
}

/// A [`CharacterRig`] bound to its world for the duration of one tick
pub struct CharacterBody<'a> {
    world: &'a mut PhysicsWorld,
    rig: &'a mut CharacterRig,
}

impl PhysicsBody for CharacterBody<'_> {
    fn linear_velocity(&self) -> Vec3 {
        self.world
            .get_rigid_body(self.rig.body)
            .map(|body| from_vector(body.linvel()))
            .unwrap_or(Vec3::ZERO)
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        if let Some(body) = self.world.rigid_body_set.get_mut(self.rig.body) {
            body.set_linvel(to_vector(velocity), true);
        }
    }

    fn apply_force(&mut self, force: Vec3, mode: ForceMode) {
        let Some(body) = self.world.rigid_body_set.get_mut(self.rig.body) else {
            return;
        };
        match mode {
            ForceMode::Impulse => body.apply_impulse(to_vector(force), true),
            ForceMode::Acceleration => {
                let mass = body.mass();
                body.add_force(to_vector(force * mass), true);
            }
        }
    }
}

impl GroundProbe for CharacterBody<'_> {
    fn collider_position(&self) -> Vec3 {
        let feet = self.world.body_position(self.rig.body).unwrap_or(Vec3::ZERO);
        feet + Vec3::Y * self.rig.geometry().local_offset
    }

    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<ProbeHit> {
        let filter = QueryFilter::default()
            .groups(InteractionGroups::new(
                Group::ALL,
                Group::from_bits_truncate(mask.bits()),
            ))
            .exclude_rigid_body(self.rig.body);

        let hit = self.world.raycast(origin, direction, max_distance, filter)?;
        Some(self.world.probe_hit(&hit))
    }
}

impl CarrierFrame for CharacterBody<'_> {
    fn reparent(&mut self, carrier: Carrier) {
        debug!(?carrier, "Character rig reparented");
        self.rig.carrier = carrier;
    }
}
