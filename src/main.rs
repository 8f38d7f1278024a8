//! Hover - headless sandbox for the floating character controller
//!
//! Builds a small physics scene, attaches a controller to a capsule and
//! replays a scripted input sequence, logging what the controller reports.

mod sandbox;
mod scene;
mod settings;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use sandbox::Sandbox;
use settings::SandboxSettings;

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    info!("Starting Hover sandbox...");

    let settings = SandboxSettings::load();
    let mut sandbox = Sandbox::build(&settings)?;
    sandbox.run(settings.scene.duration, settings.scene.frame_time)?;
    sandbox.report();

    Ok(())
}
