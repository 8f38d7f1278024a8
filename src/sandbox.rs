//! Headless sandbox world: ground, a ping-pong platform and one scripted character

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{ensure, Context, Result};
use glam::Vec3;
use hover_controller::{FloatingController, JumpState};
use hover_core::GameTime;
use hover_physics::{CharacterRig, PhysicsConfig, PhysicsWorld, RigConfig};
use rapier3d::prelude::RigidBodyHandle;
use tracing::info;

use crate::scene::{PingPongMover, ScriptedActor};
use crate::settings::SandboxSettings;

/// Counts of controller notifications seen during a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SandboxStats {
    pub surface_changes: u32,
    pub launches: u32,
    pub landings: u32,
}

pub struct Sandbox {
    time: GameTime,
    world: PhysicsWorld,
    rig: CharacterRig,
    controller: FloatingController,
    platform: RigidBodyHandle,
    mover: PingPongMover,
    actor: ScriptedActor,
    stats: Rc<RefCell<SandboxStats>>,
}

impl Sandbox {
    pub fn build(settings: &SandboxSettings) -> Result<Self> {
        settings.validate()?;
        let scene = &settings.scene;
        let mut world = PhysicsWorld::with_config(PhysicsConfig {
            timestep: settings.time.fixed_timestep,
            ..Default::default()
        });

        world.create_ground(0.0);
        let (platform, info) = world
            .create_platform(scene.platform_half_extents, scene.platform_start)
            .context("Failed to create platform")?;
        info!(platform = info.id.0, "Platform ready");

        let rig = CharacterRig::spawn(&mut world, scene.spawn, RigConfig::default());
        let mut controller =
            FloatingController::try_attach(settings.controller.clone(), Some(rig.geometry()))
                .context("Failed to attach controller")?;
        world.update_queries();

        let stats = Rc::new(RefCell::new(SandboxStats::default()));
        let hits = Rc::clone(&stats);
        controller.on_hit_changed(move |surface| {
            hits.borrow_mut().surface_changes += 1;
            info!(?surface, "Ground changed");
        });
        let jumps = Rc::clone(&stats);
        controller.on_jump_state_changed(move |state| {
            let mut stats = jumps.borrow_mut();
            match state {
                JumpState::Launch => stats.launches += 1,
                JumpState::Landing => stats.landings += 1,
                _ => {}
            }
            info!(?state, "Jump state changed");
        });

        Ok(Self {
            time: GameTime::new(settings.time.clone()),
            world,
            rig,
            controller,
            platform,
            mover: PingPongMover::new(
                scene.platform_start,
                scene.platform_end,
                scene.platform_duration,
            ),
            actor: ScriptedActor::new(scene.script.clone()),
            stats,
        })
    }

    /// Feed `duration` seconds of frames of length `frame_time`
    pub fn run(&mut self, duration: f32, frame_time: f32) -> Result<()> {
        ensure!(
            frame_time.is_finite() && frame_time > 0.0,
            "frame time must be positive, got {}",
            frame_time
        );
        let frames = (duration / frame_time).ceil().max(0.0) as u32;
        for _ in 0..frames {
            self.frame(frame_time)?;
        }
        Ok(())
    }

    /// One variable-length frame, split into fixed steps
    pub fn frame(&mut self, dt: f32) -> Result<()> {
        self.time.update(dt);
        let fixed = self.time.config.fixed_timestep;
        for _ in 0..self.time.fixed_steps() {
            self.fixed_step(fixed)?;
        }
        Ok(())
    }

    fn fixed_step(&mut self, dt: f32) -> Result<()> {
        self.actor.update(&mut self.controller, dt);

        let target = self.mover.advance(dt);
        self.world.move_kinematic(self.platform, target)?;

        self.controller.tick(&mut self.rig.bind(&mut self.world), dt);
        self.world.step();
        self.rig.follow_carrier(&mut self.world);
        Ok(())
    }

    pub fn controller(&self) -> &FloatingController {
        &self.controller
    }

    pub fn stats(&self) -> SandboxStats {
        *self.stats.borrow()
    }

    pub fn character_position(&self) -> Vec3 {
        self.rig.position(&self.world).unwrap_or(Vec3::ZERO)
    }

    /// Log the final state of the run
    pub fn report(&self) {
        let position = self.character_position();
        let stats = self.stats();
        info!(
            x = position.x,
            y = position.y,
            z = position.z,
            grounded = self.controller.is_grounded(),
            jump = ?self.controller.jump_state(),
            platform = ?self.controller.current_platform(),
            "Final character state"
        );
        info!(
            surface_changes = stats.surface_changes,
            launches = stats.launches,
            landings = stats.landings,
            elapsed = self.controller.now(),
            "Run summary"
        );
    }
}
