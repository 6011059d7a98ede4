//! Headless frame loop.
//!
//! Runs both stage engines for a fixed number of simulated frames: update,
//! then draw the background with the fighters' positions and the weather on
//! top. Scene imagery is fetched on a tokio runtime between frames.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use arena_common::{Color, SeededRandom};
use arena_kernel::{Canvas, FsImageLoader, RecordingSurface, Surface};
use arena_stage::{
    AudioTrigger, BackdropCompositor, PlayerPositions, SceneKind, WeatherKind, WeatherOverlay,
    REFERENCE_WIDTH, THUNDER,
};
use tracing::{debug, info};

use crate::audio::LogAudio;
use crate::config::EngineConfig;

/// Where frames are drawn.
enum Target {
    Raster(Canvas),
    Recording(RecordingSurface),
}

impl Target {
    fn surface(&mut self) -> &mut dyn Surface {
        match self {
            Self::Raster(canvas) => canvas,
            Self::Recording(recording) => recording,
        }
    }
}

/// Outcome of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Frames simulated.
    pub frames: u32,
    /// Scene on screen at the end.
    pub scene: SceneKind,
    /// Weather at the end.
    pub weather: WeatherKind,
    /// Lightning strikes seen.
    pub strikes: u64,
    /// Thunder cues played.
    pub thunder: u64,
    /// Snapshots written.
    pub snapshots: Vec<PathBuf>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} frames, scene {}, weather {}, {} lightning strikes, {} thunder cues, {} snapshots",
            self.frames,
            self.scene,
            self.weather,
            self.strikes,
            self.thunder,
            self.snapshots.len()
        )
    }
}

/// Owns the engines and the drawing target.
pub struct Driver {
    config: EngineConfig,
    target: Target,
    background: BackdropCompositor,
    weather: WeatherOverlay,
    audio: Arc<LogAudio>,
    frame: u32,
    snapshots: Vec<PathBuf>,
}

impl Driver {
    /// Builds both engines from `config`.
    pub fn new(config: EngineConfig) -> Self {
        let loader = Arc::new(FsImageLoader::new(&config.asset_root));
        let audio = Arc::new(LogAudio::new(config.sound_enabled));

        // Distinct streams so the two engines don't mirror each other.
        let background_rng = SeededRandom::from_option(config.seed);
        let weather_rng = SeededRandom::from_option(config.seed.map(|s| s.wrapping_add(1)));

        let background =
            BackdropCompositor::new(config.width, config.height, loader, Box::new(background_rng));
        let trigger: Arc<dyn AudioTrigger> = audio.clone();
        let weather = WeatherOverlay::new(
            config.width,
            config.height,
            Box::new(weather_rng),
            Some(trigger),
        );

        let target = if config.dry_run {
            Target::Recording(RecordingSurface::new(
                config.width as f32,
                config.height as f32,
            ))
        } else {
            Target::Raster(Canvas::new(config.width, config.height))
        };

        Self {
            config,
            target,
            background,
            weather,
            audio,
            frame: 0,
            snapshots: Vec::new(),
        }
    }

    /// Loads the starting scene and applies the configured stage settings.
    pub async fn start(&mut self) {
        self.background.initialize().await;
        self.background.switch_to(self.config.scene, false).await;
        self.background.set_time_of_day(self.config.time_of_day);
        if self.config.scene_cycle_ms > 0.0 {
            self.background.enable_auto_cycle(self.config.scene_cycle_ms);
        }

        self.weather.initialize();
        self.weather.set_kind(self.config.weather, false);
        if self.config.weather_cycle_ms > 0.0 {
            self.weather.enable_auto_cycle(self.config.weather_cycle_ms);
        }
        info!(
            "Stage ready: {} / {} at {}x{}",
            self.config.scene, self.config.weather, self.config.width, self.config.height
        );
    }

    /// Where the two fighters stand on `frame`, in reference-width units.
    /// They circle the centre of the stage and close in and back off.
    pub fn players(&self, frame: u32) -> PlayerPositions {
        let t = frame as f32 * self.config.frame_ms / 1000.0;
        let centre = REFERENCE_WIDTH / 2.0 + (t * 0.7).sin() * REFERENCE_WIDTH * 0.3;
        let gap = 120.0 + (t * 1.3).sin() * 60.0;
        PlayerPositions::new(centre - gap / 2.0, centre + gap / 2.0)
    }

    /// Simulates and draws one frame.
    pub async fn step(&mut self) -> Result<()> {
        for kind in self.background.take_load_requests() {
            self.background.load_kind(kind).await;
        }

        let delta = self.config.frame_ms;
        self.background.update(delta);
        self.weather.update(delta);

        let players = self.players(self.frame);
        match &mut self.target {
            Target::Raster(canvas) => canvas.clear(Color::BLACK),
            Target::Recording(recording) => {
                recording.take_calls();
            },
        }
        let surface = self.target.surface();
        self.background.draw(surface, Some(players));
        self.weather.draw(surface);

        self.snapshot()?;
        self.frame += 1;
        Ok(())
    }

    fn snapshot(&mut self) -> Result<()> {
        let every = self.config.snapshot_every;
        if every == 0 || self.frame % every != 0 {
            return Ok(());
        }
        let canvas = match &self.target {
            Target::Raster(canvas) => canvas,
            Target::Recording(recording) => {
                debug!("Frame {}: {} draw calls", self.frame, recording.calls().len());
                return Ok(());
            },
        };

        fs::create_dir_all(&self.config.output_dir).with_context(|| {
            format!("creating {}", self.config.output_dir.display())
        })?;
        let path = self
            .config
            .output_dir
            .join(format!("frame_{:05}.png", self.frame));
        canvas
            .save_png(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        debug!("Saved {}", path.display());
        self.snapshots.push(path);
        Ok(())
    }

    /// What the run has done so far.
    pub fn summary(&self) -> Summary {
        Summary {
            frames: self.frame,
            scene: self.background.current_scene(),
            weather: self.weather.kind(),
            strikes: self.weather.lightning().strikes(),
            thunder: self.audio.count(THUNDER),
            snapshots: self.snapshots.clone(),
        }
    }

    /// The background engine.
    pub fn background(&self) -> &BackdropCompositor {
        &self.background
    }

    /// The weather engine.
    pub fn weather(&self) -> &WeatherOverlay {
        &self.weather
    }
}

/// Runs `config.frames` frames on a fresh tokio runtime.
pub fn run(config: EngineConfig) -> Result<Summary> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    runtime.block_on(async {
        let frames = config.frames;
        let mut driver = Driver::new(config);
        driver.start().await;
        for _ in 0..frames {
            driver.step().await?;
        }
        Ok(driver.summary())
    })
}
