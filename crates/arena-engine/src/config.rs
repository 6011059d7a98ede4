//! Driver configuration.
//!
//! Provides the canvas, stage, simulation and output settings of a run.
//! Configuration can be loaded from and saved to a TOML file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use arena_stage::{SceneKind, TimeOfDay, WeatherKind, REFERENCE_FRAME_MS};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "arena.toml";

/// Driver configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Canvas ===
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,

    // === Assets ===
    /// Directory image URIs are resolved against
    pub asset_root: PathBuf,

    // === Stage ===
    /// Scene shown at start
    pub scene: SceneKind,
    /// Weather at start
    pub weather: WeatherKind,
    /// Time-of-day tint
    pub time_of_day: TimeOfDay,
    /// Background auto-cycle period in ms (0 = disabled)
    pub scene_cycle_ms: f64,
    /// Weather auto-cycle period in ms (0 = disabled)
    pub weather_cycle_ms: f64,

    // === Simulation ===
    /// Number of frames to simulate
    pub frames: u32,
    /// Simulated time per frame in ms
    pub frame_ms: f32,
    /// Random seed (None = entropy)
    pub seed: Option<u64>,

    // === Audio ===
    /// Whether thunder cues are played
    pub sound_enabled: bool,

    // === Output ===
    /// Write a PNG every N frames (0 = disabled)
    pub snapshot_every: u32,
    /// Where snapshots go
    pub output_dir: PathBuf,
    /// Record draw calls instead of rasterizing
    pub dry_run: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // Canvas
            width: 800,
            height: 600,

            // Assets
            asset_root: PathBuf::from("."),

            // Stage
            scene: SceneKind::Dojo,
            weather: WeatherKind::None,
            time_of_day: TimeOfDay::Day,
            scene_cycle_ms: 0.0,
            weather_cycle_ms: 0.0,

            // Simulation
            frames: 600,
            frame_ms: REFERENCE_FRAME_MS,
            seed: None,

            // Audio
            sound_enabled: true,

            // Output
            snapshot_every: 0,
            output_dir: PathBuf::from("snapshots"),
            dry_run: false,
        }
    }
}

impl EngineConfig {
    /// Load configuration from `arena.toml` in the working directory.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No config at {}, using defaults", path.display());
                return Self::default();
            },
            Err(e) => {
                warn!("Could not read {}: {e}", path.display());
                return Self::default();
            },
        };

        toml::from_str(&text).map_or_else(
            |e| {
                warn!("Ignoring malformed config {}: {e}", path.display());
                Self::default()
            },
            |config| {
                info!("Loaded config from {}", path.display());
                config
            },
        )
    }

    /// Save configuration to a specific path, creating parent directories.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();
        let text = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, text)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        // Canvas
        self.width = self.width.clamp(16, 7680);
        self.height = self.height.clamp(16, 4320);

        // Cycles
        self.scene_cycle_ms = self.scene_cycle_ms.max(0.0);
        self.weather_cycle_ms = self.weather_cycle_ms.max(0.0);

        // Simulation
        self.frame_ms = self.frame_ms.clamp(1.0, 1000.0);
    }
}
