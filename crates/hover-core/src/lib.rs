//! Hover Core - Core types and collaborator contracts for the Hover controller
//!
//! This crate provides the foundational pieces shared by the controller and
//! its physics backends:
//! - Mathematical primitives (re-exported from glam)
//! - Identity handles for probed surfaces, platforms and mirror transforms
//! - The collaborator contracts a hosting engine implements
//! - Response curves sampled by the locomotion solver
//! - Fixed-step time keeping

pub mod backend;
pub mod curve;
pub mod time;
pub mod types;

pub use backend::{
    Carrier, CarrierFrame, CharacterBackend, ForceMode, GroundProbe, PhysicsBody, PlatformInfo,
    ProbeHit,
};
pub use curve::{Curve, CurveError, Keyframe};
pub use glam::{Quat, Vec3};
pub use time::{FixedClock, GameTime, TimeConfig};
pub use types::{ColliderGeometry, LayerMask, MirrorId, PlatformId, SurfaceId, Transform};
