//! # Arena
//!
//! Runs the backdrop engines headlessly for a configured number of frames.
//!
//! Usage: `arena [CONFIG]` where `CONFIG` defaults to `arena.toml`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use anyhow::Result;
use arena_engine::EngineConfig;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("arena=info".parse()?))
        .init();

    info!("Arena backdrop starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    };
    config.validate();

    let summary = arena_engine::run(config)?;
    info!("Finished: {}", summary);
    Ok(())
}
