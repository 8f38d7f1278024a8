//! A scripted kinematic backend: unit mass, explicit Euler, and a ground the
//! test swaps in and out by hand.

#![allow(dead_code)]

use glam::Vec3;
use hover_controller::{ColliderGeometry, ControllerConfig, FloatingController};
use hover_core::{
    Carrier, CarrierFrame, ForceMode, GroundProbe, LayerMask, MirrorId, PhysicsBody, PlatformId,
    PlatformInfo, ProbeHit, SurfaceId,
};

pub const DT: f32 = 0.02;

/// A flat surface at a fixed height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub id: SurfaceId,
    pub height: f32,
    pub velocity: Option<Vec3>,
    pub platform: Option<PlatformInfo>,
}

impl Surface {
    pub fn ground(id: u64) -> Self {
        Self {
            id: SurfaceId(id),
            height: 0.0,
            velocity: None,
            platform: None,
        }
    }

    pub fn platform(id: u64, platform: u32, mirror: u32) -> Self {
        Self {
            platform: Some(PlatformInfo {
                id: PlatformId(platform),
                mirror: MirrorId(mirror),
            }),
            velocity: Some(Vec3::ZERO),
            ..Self::ground(id)
        }
    }
}

#[derive(Debug, Default)]
pub struct ScriptedBackend {
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
    pub surface: Option<Surface>,
    pub reparents: Vec<Carrier>,
}

impl ScriptedBackend {
    /// A body whose collider sits `height` above a surface
    pub fn standing_on(surface: Surface, height: f32) -> Self {
        Self {
            position: Vec3::new(0.0, surface.height + height, 0.0),
            surface: Some(surface),
            ..Default::default()
        }
    }

    /// Integrate this tick's accelerations
    pub fn step(&mut self, dt: f32) {
        self.velocity += self.acceleration * dt;
        self.position += self.velocity * dt;
        self.acceleration = Vec3::ZERO;
    }
}

impl PhysicsBody for ScriptedBackend {
    fn linear_velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn apply_force(&mut self, force: Vec3, mode: ForceMode) {
        match mode {
            ForceMode::Impulse => self.velocity += force,
            ForceMode::Acceleration => self.acceleration += force,
        }
    }
}

impl GroundProbe for ScriptedBackend {
    fn collider_position(&self) -> Vec3 {
        self.position
    }

    fn cast_ray(
        &self,
        origin: Vec3,
        _direction: Vec3,
        max_distance: f32,
        _mask: LayerMask,
    ) -> Option<ProbeHit> {
        let surface = self.surface?;
        let distance = origin.y - surface.height;
        if !(0.0..=max_distance).contains(&distance) {
            return None;
        }

        Some(ProbeHit {
            surface: surface.id,
            distance,
            point: Vec3::new(origin.x, surface.height, origin.z),
            surface_velocity: surface.velocity,
            platform: surface.platform,
        })
    }
}

impl CarrierFrame for ScriptedBackend {
    fn reparent(&mut self, carrier: Carrier) {
        self.reparents.push(carrier);
    }
}

/// Controller with a collider 1m above the body origin, resting 1m over the ground
pub fn controller(config: ControllerConfig) -> FloatingController {
    FloatingController::try_attach(config, Some(ColliderGeometry::new(1.0, 0.0)))
        .expect("valid test config")
}

/// Tick the controller, then integrate
pub fn tick(controller: &mut FloatingController, backend: &mut ScriptedBackend, dt: f32) {
    controller.tick(backend, dt);
    backend.step(dt);
}
