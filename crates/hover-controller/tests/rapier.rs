//! The controller riding a real rapier3d body

use glam::Vec3;
use hover_controller::{ControllerConfig, FloatingController};
use hover_core::{Carrier, SurfaceId};
use hover_physics::{CharacterRig, PhysicsWorld, RigConfig};

const DT: f32 = 1.0 / 50.0;

fn config() -> ControllerConfig {
    let mut config = ControllerConfig::default();
    config.floating.floating_offset = 0.3;
    config.floating.ride_spring_strength = 200.0;
    config.floating.ride_spring_damper = 20.0;
    config
}

fn spawn(world: &mut PhysicsWorld, feet: Vec3) -> (CharacterRig, FloatingController) {
    let rig = CharacterRig::spawn(world, feet, RigConfig::default());
    let controller = FloatingController::try_attach(config(), Some(rig.geometry())).unwrap();
    world.update_queries();
    (rig, controller)
}

fn step(world: &mut PhysicsWorld, rig: &mut CharacterRig, controller: &mut FloatingController) {
    controller.tick(&mut rig.bind(world), DT);
    world.step();
    rig.follow_carrier(world);
}

#[test]
fn test_settles_at_rest_height() {
    let mut world = PhysicsWorld::new();
    let ground = world.create_ground(0.0);
    let (mut rig, mut controller) = spawn(&mut world, Vec3::new(0.0, 1.0, 0.0));
    assert!((controller.rest_height() - 1.2).abs() < 1e-5);

    for _ in 0..200 {
        step(&mut world, &mut rig, &mut controller);
    }

    let (index, generation) = ground.into_raw_parts();
    assert!(controller.is_grounded());
    assert_eq!(
        controller.last_hit(),
        Some(SurfaceId::from_raw_parts(index, generation))
    );

    let feet = rig.position(&world).unwrap();
    assert!((feet.y - 0.3).abs() < 0.05, "feet at {}", feet.y);
    let distance = controller.last_probe().hit.unwrap().distance;
    assert!((distance - controller.rest_height()).abs() < 0.05);
    assert!(rig.velocity(&world).unwrap().length() < 0.1);
}

#[test]
fn test_rides_moving_platform() {
    let mut world = PhysicsWorld::new();
    let (platform, info) = world
        .create_platform(Vec3::new(3.0, 0.25, 3.0), Vec3::ZERO)
        .unwrap();
    let (mut rig, mut controller) = spawn(&mut world, Vec3::new(0.0, 0.55, 0.0));

    for i in 1..=100 {
        world
            .move_kinematic(platform, Vec3::new(0.02 * i as f32, 0.0, 0.0))
            .unwrap();
        step(&mut world, &mut rig, &mut controller);
    }

    assert_eq!(controller.current_platform(), Some(info.id));
    assert_eq!(controller.carrier(), Carrier::Mirror(info.mirror));
    assert_eq!(rig.carrier(), Carrier::Mirror(info.mirror));

    let platform_x = world.body_position(platform).unwrap().x;
    let feet = rig.position(&world).unwrap();
    assert!((platform_x - 2.0).abs() < 1e-3);
    assert!((feet.x - platform_x).abs() < 0.1, "feet at {}", feet.x);

    // Taking the platform away hands the rig back to its origin
    world.remove_rigid_body(platform);
    world.update_queries();
    step(&mut world, &mut rig, &mut controller);

    assert_eq!(controller.current_platform(), None);
    assert_eq!(rig.carrier(), Carrier::Origin);
    assert!(!controller.is_grounded());
}
