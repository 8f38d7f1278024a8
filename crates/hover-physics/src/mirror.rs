//! Mirror transforms and the platform registry.
//!
//! A mirror is a free-standing node that copies a platform body's pose after
//! every step. Characters ride a platform by following its mirror, so the
//! platform body never owns them and can be removed without taking a rider
//! down with it.

use std::collections::HashMap;

use glam::Vec3;
use hover_core::{MirrorId, PlatformId, PlatformInfo, Transform};
use rapier3d::prelude::*;
use tracing::debug;

use crate::error::PhysicsError;
use crate::transform_from_isometry;

/// Pose copy of one platform body
#[derive(Debug, Clone)]
pub struct MirrorTransform {
    target: RigidBodyHandle,
    pose: Transform,
    previous: Transform,
}

impl MirrorTransform {
    pub fn target(&self) -> RigidBodyHandle {
        self.target
    }

    /// Pose after the last sync
    pub fn pose(&self) -> Transform {
        self.pose
    }

    /// Pose before the last sync
    pub fn previous(&self) -> Transform {
        self.previous
    }

    /// Where a point rigidly attached to the mirror ended up after the last sync
    pub fn carry(&self, point: Vec3) -> Vec3 {
        self.pose
            .transform_point(self.previous.inverse_transform_point(point))
    }

    /// Copy the target's pose. A missing target freezes the mirror in place.
    fn sync(&mut self, bodies: &RigidBodySet) {
        self.previous = self.pose;
        if let Some(body) = bodies.get(self.target) {
            self.pose = transform_from_isometry(body.position());
        }
    }
}

/// All mirrors in a world, addressed by [`MirrorId`]. Ids are never reused.
#[derive(Debug, Default)]
pub struct MirrorSet {
    mirrors: HashMap<MirrorId, MirrorTransform>,
    next_id: u32,
}

impl MirrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mirror following `target`, starting at its current pose
    pub fn create(
        &mut self,
        target: RigidBodyHandle,
        bodies: &RigidBodySet,
    ) -> Result<MirrorId, PhysicsError> {
        let body = bodies.get(target).ok_or(PhysicsError::UnknownBody(target))?;
        let pose = transform_from_isometry(body.position());

        let id = MirrorId(self.next_id);
        self.next_id += 1;
        self.mirrors.insert(
            id,
            MirrorTransform {
                target,
                pose,
                previous: pose,
            },
        );
        debug!(mirror = id.0, "Mirror transform created");
        Ok(id)
    }

    pub fn get(&self, id: MirrorId) -> Option<&MirrorTransform> {
        self.mirrors.get(&id)
    }

    /// Drop every mirror following `target`, returning their ids
    pub fn remove_following(&mut self, target: RigidBodyHandle) -> Vec<MirrorId> {
        let removed: Vec<MirrorId> = self
            .mirrors
            .iter()
            .filter(|(_, mirror)| mirror.target == target)
            .map(|(&id, _)| id)
            .collect();
        for id in &removed {
            self.mirrors.remove(id);
            debug!(mirror = id.0, "Mirror transform removed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.mirrors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mirrors.is_empty()
    }

    /// Copy every target's pose; run once after each physics step
    pub fn sync(&mut self, bodies: &RigidBodySet) {
        for mirror in self.mirrors.values_mut() {
            mirror.sync(bodies);
        }
    }
}

/// Maps colliders to the platform they belong to
#[derive(Debug, Default)]
pub struct PlatformRegistry {
    by_collider: HashMap<ColliderHandle, PlatformInfo>,
    next_id: u32,
}

impl PlatformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new platform made of `colliders`, ridden through `mirror`
    pub fn register(&mut self, colliders: &[ColliderHandle], mirror: MirrorId) -> PlatformInfo {
        let info = PlatformInfo {
            id: PlatformId(self.next_id),
            mirror,
        };
        self.next_id += 1;

        for &collider in colliders {
            self.by_collider.insert(collider, info);
        }
        debug!(
            platform = info.id.0,
            mirror = mirror.0,
            colliders = colliders.len(),
            "Platform registered"
        );
        info
    }

    /// Platform capability of a collider, if it has one
    pub fn lookup(&self, collider: ColliderHandle) -> Option<PlatformInfo> {
        self.by_collider.get(&collider).copied()
    }

    /// Drop colliders that no longer exist
    pub fn forget(&mut self, colliders: &[ColliderHandle]) {
        for collider in colliders {
            self.by_collider.remove(collider);
        }
    }

    /// Number of colliders with the platform capability
    pub fn len(&self) -> usize {
        self.by_collider.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_collider.is_empty()
    }
}
