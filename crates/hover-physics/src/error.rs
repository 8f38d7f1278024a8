//! Error types for the rapier backend

use rapier3d::prelude::RigidBodyHandle;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PhysicsError {
    #[error("Unknown rigid body {0:?}")]
    UnknownBody(RigidBodyHandle),

    #[error("Rigid body {0:?} has no colliders to register as a platform")]
    NoColliders(RigidBodyHandle),
}
