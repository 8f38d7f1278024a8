//! Hover Controller - floating rigidbody character controller
//!
//! Instead of resting its collider on the ground, the character is held above
//! the surface by a spring-damper driven by a single downward probe. Each fixed
//! tick runs, in order:
//! - [`LocomotionSolver`]: steers planar velocity toward the input direction
//! - [`JumpStateMachine`]: launch, rise, fall and landing with coyote time and
//!   input buffering
//! - [`SuspensionProbe`]: grounded state and the ride spring
//! - [`PlatformTracker`]: parents the character under moving platforms
//!
//! The controller talks to its host only through the collaborator traits in
//! [`hover_core::backend`].

pub mod config;
mod controller;
pub mod error;
pub mod events;
pub mod jump;
pub mod locomotion;
pub mod platform;
pub mod suspension;

#[cfg(test)]
mod testing;

pub use config::{ControllerConfig, FloatingConfig, JumpConfig, LocomotionConfig};
pub use controller::FloatingController;
pub use error::{AttachError, ConfigError};
pub use events::{ChangeNotifier, Listeners};
pub use hover_core::ColliderGeometry;
pub use jump::{JumpState, JumpStateMachine};
pub use locomotion::{LocomotionSolver, MIN_TICK_DELTA};
pub use platform::PlatformTracker;
pub use suspension::{spring_force, ProbeReport, SuspensionProbe};
