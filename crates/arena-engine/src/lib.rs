//! # Arena Engine
//!
//! Headless driver for the Arena backdrop.
//!
//! This crate wires the stage engines to the outside world:
//! - Config: `arena.toml` loading, saving and validation
//! - Driver: the frame loop, scene-load servicing and PNG snapshots
//! - Audio: a logging sound-cue sink

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod audio;
pub mod config;
pub mod driver;

pub use config::EngineConfig;
pub use driver::{run, Driver, Summary};
