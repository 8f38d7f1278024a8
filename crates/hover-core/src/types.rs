//! Core types used throughout Hover

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Identity of a surface hit by the ground probe.
///
/// This is an identity-only handle: holding one never keeps the surface alive,
/// and comparing two of them is the only meaningful operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(pub u64);

impl SurfaceId {
    /// Pack a generational index (as used by arena-backed physics engines)
    pub fn from_raw_parts(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | index as u64)
    }

    /// Split back into `(index, generation)`
    pub fn raw_parts(&self) -> (u32, u32) {
        (self.0 as u32, (self.0 >> 32) as u32)
    }
}

/// Identity of an object carrying the rigid platform capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformId(pub u32);

/// Identity of a mirror transform node a character can be parented under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MirrorId(pub u32);

/// Bit mask selecting which collision layers the ground probe may hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: LayerMask = LayerMask(u32::MAX);
    pub const NONE: LayerMask = LayerMask(0);

    /// Build a mask from layer indices (0..32). Out of range layers are ignored.
    pub fn from_layers(layers: &[u8]) -> Self {
        let bits = layers
            .iter()
            .filter(|&&layer| layer < 32)
            .fold(0u32, |acc, &layer| acc | (1 << layer));
        Self(bits)
    }

    /// Check whether a single layer index is selected
    pub fn contains_layer(&self, layer: u8) -> bool {
        layer < 32 && self.0 & (1 << layer) != 0
    }

    /// Check whether any of the given membership bits are selected
    pub fn intersects(&self, memberships: u32) -> bool {
        self.0 & memberships != 0
    }

    pub fn bits(&self) -> u32 {
        self.0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Vertical layout of the character's collider, read once at attach
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ColliderGeometry {
    /// Height of the collider transform above the body's origin
    pub local_offset: f32,
    /// Height of the collider's center above its transform
    pub center_offset: f32,
}

impl ColliderGeometry {
    pub fn new(local_offset: f32, center_offset: f32) -> Self {
        Self {
            local_offset,
            center_offset,
        }
    }

    /// Hover distance between the probe origin and the ground
    pub fn rest_height(&self, floating_offset: f32) -> f32 {
        self.local_offset + self.center_offset + floating_offset
    }
}

/// Rigid pose with scale, used for mirror transforms and carried frames
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            scale: Vec3::ONE,
        }
    }

    /// Map a point from this transform's local space into world space
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * (self.scale * local)
    }

    /// Map a world space point into this transform's local space
    pub fn inverse_transform_point(&self, world: Vec3) -> Vec3 {
        (self.rotation.inverse() * (world - self.position)) / self.scale
    }
}
