//! Hover Physics - rapier3d backend for the floating character controller
//!
//! Owns the simulation, the mirror transforms that follow moving platforms,
//! and the registry telling the ground probe which colliders are platforms.

mod error;
mod mirror;
mod rig;

pub use error::PhysicsError;
pub use mirror::{MirrorSet, MirrorTransform, PlatformRegistry};
pub use rig::{CharacterBody, CharacterRig, RigConfig};

use glam::{Quat, Vec3};
use hover_core::{LayerMask, PlatformInfo, ProbeHit, SurfaceId, Transform};
use nalgebra::Unit;
use rapier3d::prelude::*;

/// Physics world configuration
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Gravity vector (default: -9.81 on Y axis)
    pub gravity: Vec3,
    /// Physics timestep (default: 1/50, matching the controller's fixed tick)
    pub timestep: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            timestep: 1.0 / 50.0,
        }
    }
}

/// The main physics world containing all simulation state
pub struct PhysicsWorld {
    pub config: PhysicsConfig,

    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,

    /// Pose copies of every registered platform
    pub mirrors: MirrorSet,
    /// Which colliders carry the rigid platform capability
    pub platforms: PlatformRegistry,

    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    pub fn with_config(config: PhysicsConfig) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = config.timestep;

        Self {
            config,
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            mirrors: MirrorSet::new(),
            platforms: PlatformRegistry::new(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Step the simulation, then refresh queries and mirrors
    pub fn step(&mut self) {
        let gravity = to_vector(self.config.gravity);

        self.physics_pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );

        self.update_queries();
        self.mirrors.sync(&self.rigid_body_set);
    }

    /// Bring the query pipeline up to date without stepping
    pub fn update_queries(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add a static collider (ground, walls, etc.)
    pub fn add_static_collider(&mut self, collider: Collider) -> ColliderHandle {
        self.collider_set.insert(collider)
    }

    /// Add a rigid body (dynamic or kinematic) with one collider
    pub fn add_body(
        &mut self,
        rigid_body: RigidBody,
        collider: Collider,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let rb_handle = self.rigid_body_set.insert(rigid_body);
        let col_handle =
            self.collider_set
                .insert_with_parent(collider, rb_handle, &mut self.rigid_body_set);
        (rb_handle, col_handle)
    }

    /// Remove a rigid body, its colliders and any mirror following it
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        let Some(body) = self.rigid_body_set.get(handle) else {
            return;
        };
        let colliders = body.colliders().to_vec();

        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
        self.platforms.forget(&colliders);
        self.mirrors.remove_following(handle);
    }

    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    pub fn get_rigid_body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(handle)
    }

    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    /// World position of a rigid body
    pub fn body_position(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set
            .get(handle)
            .map(|body| from_vector(body.translation()))
    }

    /// Put a collider on the given collision layers
    pub fn set_layers(&mut self, handle: ColliderHandle, layers: LayerMask) {
        if let Some(collider) = self.collider_set.get_mut(handle) {
            collider.set_collision_groups(InteractionGroups::new(
                Group::from_bits_truncate(layers.bits()),
                Group::ALL,
            ));
        }
    }

    /// Cast a ray and return the closest hit
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<RaycastHit> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            to_vector(direction),
        );

        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                filter,
            )
            .map(|(handle, intersection)| RaycastHit {
                collider: handle,
                distance: intersection.time_of_impact,
                point: origin + direction * intersection.time_of_impact,
                normal: from_vector(&intersection.normal),
            })
    }

    /// Describe a raycast hit the way the ground probe reports it
    pub fn probe_hit(&self, hit: &RaycastHit) -> ProbeHit {
        let (index, generation) = hit.collider.into_raw_parts();
        let surface_velocity = self
            .collider_set
            .get(hit.collider)
            .and_then(|collider| collider.parent())
            .and_then(|parent| self.rigid_body_set.get(parent))
            .map(|body| from_vector(body.linvel()));

        ProbeHit {
            surface: SurfaceId::from_raw_parts(index, generation),
            distance: hit.distance,
            point: hit.point,
            surface_velocity,
            platform: self.platforms.lookup(hit.collider),
        }
    }

    /// Create a ground plane collider
    pub fn create_ground(&mut self, y: f32) -> ColliderHandle {
        let normal = Unit::new_normalize(vector![0.0, 1.0, 0.0]);
        let ground = ColliderBuilder::halfspace(normal)
            .translation(vector![0.0, y, 0.0])
            .friction(0.7)
            .restitution(0.0)
            .build();
        self.add_static_collider(ground)
    }

    /// Create a static box collider
    pub fn create_static_box(&mut self, half_extents: Vec3, position: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(to_vector(position))
            .friction(0.7)
            .build();
        self.add_static_collider(collider)
    }

    /// Give an existing body the rigid platform capability
    pub fn register_platform(
        &mut self,
        handle: RigidBodyHandle,
    ) -> Result<PlatformInfo, PhysicsError> {
        let body = self
            .rigid_body_set
            .get(handle)
            .ok_or(PhysicsError::UnknownBody(handle))?;
        let colliders = body.colliders().to_vec();
        if colliders.is_empty() {
            return Err(PhysicsError::NoColliders(handle));
        }

        let mirror = self.mirrors.create(handle, &self.rigid_body_set)?;
        Ok(self.platforms.register(&colliders, mirror))
    }

    /// Create a kinematic box platform, driven with [`PhysicsWorld::move_kinematic`]
    pub fn create_platform(
        &mut self,
        half_extents: Vec3,
        position: Vec3,
    ) -> Result<(RigidBodyHandle, PlatformInfo), PhysicsError> {
        let body = RigidBodyBuilder::kinematic_position_based()
            .translation(to_vector(position))
            .build();
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .friction(0.7)
            .build();

        let (handle, _) = self.add_body(body, collider);
        let info = self.register_platform(handle)?;
        Ok((handle, info))
    }

    /// Set where a kinematic body will be after the next step
    pub fn move_kinematic(
        &mut self,
        handle: RigidBodyHandle,
        position: Vec3,
    ) -> Result<(), PhysicsError> {
        let body = self
            .rigid_body_set
            .get_mut(handle)
            .ok_or(PhysicsError::UnknownBody(handle))?;
        body.set_next_kinematic_translation(to_vector(position));
        Ok(())
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Detailed raycast hit information
#[derive(Debug, Clone)]
pub struct RaycastHit {
    pub collider: ColliderHandle,
    /// Distance along the ray to the hit point
    pub distance: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

pub(crate) fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

pub(crate) fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub(crate) fn transform_from_isometry(iso: &Isometry<Real>) -> Transform {
    let rotation = iso.rotation;
    Transform::from_position_rotation(
        from_vector(&iso.translation.vector),
        Quat::from_xyzw(rotation.i, rotation.j, rotation.k, rotation.w),
    )
}
