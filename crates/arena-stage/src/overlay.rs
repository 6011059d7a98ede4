//! The particle weather overlay.
//!
//! [`WeatherOverlay`] owns the active [`WeatherKind`], its particle pool,
//! the crossfade towards the next kind, the fog veil and the lightning
//! sub-system. It is drawn on top of the background every frame.

use std::sync::Arc;

use arena_common::{Color, RandomSource, StageResult};
use arena_kernel::{Paint, Surface};
use tracing::{debug, error, info};

use crate::audio::{AudioTrigger, THUNDER};
use crate::crossfade::{clamp_delta, frame_factor, Crossfade};
use crate::cycle::{pick_other, AutoCycle};
use crate::lightning::Lightning;
use crate::particles::Particle;
use crate::weather::{WeatherKind, Wind};

/// Crossfade progress per reference frame.
pub const WEATHER_TRANSITION_SPEED: f32 = 0.01;

/// Default auto-cycle period.
pub const DEFAULT_WEATHER_CYCLE_MS: f64 = 30_000.0;

/// Color of the full-screen fog veil.
pub const FOG_TINT: Color = Color::rgb(200, 215, 220);

/// Color of a lightning flash.
pub const FLASH_COLOR: Color = Color::WHITE;

/// Progress past which a fade to clear weather stops drawing.
const FADE_OUT_CUTOFF: f32 = 0.9;

/// Weather particle simulation and renderer.
///
/// # Example
///
/// ```
/// use arena_common::SeededRandom;
/// use arena_kernel::RecordingSurface;
/// use arena_stage::{WeatherKind, WeatherOverlay};
///
/// let mut weather = WeatherOverlay::new(800, 600, Box::new(SeededRandom::with_seed(1)), None);
/// weather.initialize();
/// weather.set_weather("rain", false).unwrap();
/// weather.update(16.67);
///
/// let mut surface = RecordingSurface::new(800.0, 600.0);
/// weather.draw(&mut surface);
/// assert_eq!(weather.kind(), WeatherKind::Rain);
/// assert_eq!(weather.particles().len(), 200);
/// ```
pub struct WeatherOverlay {
    width: f32,
    height: f32,
    rng: Box<dyn RandomSource>,
    audio: Option<Arc<dyn AudioTrigger>>,
    kind: WeatherKind,
    max_particles: usize,
    wind: Wind,
    fog_opacity: f32,
    particles: Vec<Particle>,
    transition: Option<Crossfade<WeatherKind>>,
    lightning: Lightning,
    auto_cycle: AutoCycle,
    clock_ms: f64,
    thunder_cues: u64,
}

impl WeatherOverlay {
    /// Creates an overlay for a `width` x `height` screen. Thunder is only
    /// ever cued when `audio` is given.
    #[must_use]
    pub fn new(
        width: u32,
        height: u32,
        rng: Box<dyn RandomSource>,
        audio: Option<Arc<dyn AudioTrigger>>,
    ) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
            rng,
            audio,
            kind: WeatherKind::None,
            max_particles: 0,
            wind: Wind::default(),
            fog_opacity: 0.0,
            particles: Vec::new(),
            transition: None,
            lightning: Lightning::new(),
            auto_cycle: AutoCycle::disabled(DEFAULT_WEATHER_CYCLE_MS),
            clock_ms: 0.0,
            thunder_cues: 0,
        }
    }

    /// Starts with clear weather.
    pub fn initialize(&mut self) {
        self.set_kind(WeatherKind::None, false);
    }

    /// Changes the weather by name. Unknown names fail with
    /// [`StageError::NotFound`](arena_common::StageError::NotFound) and leave
    /// every piece of state untouched.
    pub fn set_weather(&mut self, name: &str, use_transition: bool) -> StageResult<()> {
        let kind = name.parse::<WeatherKind>().map_err(|e| {
            error!("Weather type \"{}\" not recognized", name);
            e
        })?;
        self.set_kind(kind, use_transition);
        Ok(())
    }

    /// Changes the weather. With `use_transition` and a different kind a
    /// crossfade starts and the live pool is left alone until it commits;
    /// otherwise the kind is applied immediately and the pool regenerated.
    pub fn set_kind(&mut self, kind: WeatherKind, use_transition: bool) {
        if use_transition && kind != self.kind {
            self.transition = Some(Crossfade::new(kind));
        } else {
            self.transition = None;
            self.apply_profile(kind);
            self.fill_pool();
        }
        info!("Weather changing to: {}", kind);
    }

    /// Makes `kind` current: sets the pool bound and fog veil, rolls the
    /// wind, and empties the pool.
    pub fn apply_profile(&mut self, kind: WeatherKind) {
        let profile = kind.profile();
        self.kind = kind;
        self.max_particles = profile.max_particles;
        self.wind = profile.roll_wind(self.rng.as_mut());
        self.fog_opacity = profile.fog_opacity;
        self.particles.clear();
        debug!(
            "Applied {} profile: {} particles, wind {:+}x{:.2}",
            kind, self.max_particles, self.wind.direction, self.wind.strength
        );
    }

    /// Adds one particle of the current kind if the pool has room. Returns
    /// whether a particle was added.
    pub fn spawn_particle(&mut self) -> bool {
        if self.particles.len() >= self.max_particles {
            return false;
        }
        match Particle::spawn(self.kind, self.wind, self.width, self.height, self.rng.as_mut()) {
            Some(particle) => {
                self.particles.push(particle);
                true
            },
            None => false,
        }
    }

    fn fill_pool(&mut self) {
        while self.spawn_particle() {}
    }

    /// Turns on periodic random weather changes.
    pub fn enable_auto_cycle(&mut self, period_ms: f64) {
        self.auto_cycle.enable(period_ms, self.clock_ms);
        info!(
            "Auto weather cycling enabled ({}s per weather)",
            period_ms / 1000.0
        );
    }

    /// Turns off periodic weather changes.
    pub fn disable_auto_cycle(&mut self) {
        self.auto_cycle.disable();
        info!("Auto weather cycling disabled");
    }

    /// Advances the simulation by `delta_ms`.
    pub fn update(&mut self, delta_ms: f32) {
        let delta_ms = clamp_delta(delta_ms);
        self.clock_ms += f64::from(delta_ms);
        let now = self.clock_ms;

        if self.transition.is_none() && self.auto_cycle.is_due(now) {
            if let Some(next) = pick_other(&WeatherKind::ALL, self.kind, self.rng.as_mut()) {
                info!("Auto-cycling weather to {}", next);
                self.set_kind(next, true);
            }
            self.auto_cycle.mark(now);
        }

        if let Some(fade) = self.transition.as_mut() {
            if let Some(target) = fade.advance(WEATHER_TRANSITION_SPEED, delta_ms) {
                self.transition = None;
                self.apply_profile(target);
                self.fill_pool();
            }
        }

        let factor = frame_factor(delta_ms);
        let (width, height) = (self.width, self.height);
        self.particles
            .retain_mut(|particle| !particle.step(factor, width, height));
        self.fill_pool();

        let stormy = self.kind.has_lightning()
            || self
                .transition
                .is_some_and(|fade| fade.target().has_lightning());
        if stormy {
            let thunder = self.audio.is_some();
            if self
                .lightning
                .update(now, delta_ms, self.rng.as_mut(), thunder)
            {
                debug!("Lightning strike at {:.0}ms", now);
            }
        } else {
            self.lightning.suppress();
        }

        self.fire_thunder(now);
    }

    fn fire_thunder(&mut self, now_ms: f64) {
        let due = self.lightning.take_due_thunder(now_ms);
        let Some(audio) = &self.audio else {
            return;
        };
        for _ in 0..due {
            if audio.sound_enabled() {
                audio.play_sound(THUNDER);
                self.thunder_cues += 1;
            } else {
                debug!("Thunder muted");
            }
        }
    }

    /// Opacity applied to everything the overlay draws: fades out towards
    /// clear weather, in from clear weather, and is 1 otherwise.
    #[must_use]
    pub fn blend_opacity(&self) -> f32 {
        match self.transition {
            Some(fade) if fade.target() == WeatherKind::None => 1.0 - fade.progress(),
            Some(fade) if self.kind == WeatherKind::None => fade.progress(),
            _ => 1.0,
        }
    }

    /// Draws the flash, the fog veil and every particle.
    pub fn draw(&self, surface: &mut dyn Surface) {
        match self.transition {
            None if self.kind == WeatherKind::None => return,
            Some(fade) if fade.target() == WeatherKind::None && fade.progress() > FADE_OUT_CUTOFF => {
                return;
            },
            _ => {},
        }

        let blend = self.blend_opacity();
        if self.lightning.is_active() {
            let flash = FLASH_COLOR.with_alpha(self.lightning.alpha() * blend);
            surface.fill_screen(&Paint::Solid(flash));
        }

        if self.fog_opacity > 0.0 {
            let fog = if self.transition.is_some() {
                self.fog_opacity * blend
            } else {
                self.fog_opacity
            };
            surface.fill_screen(&Paint::Solid(FOG_TINT.with_alpha(fog)));
        }

        for particle in &self.particles {
            particle.draw(surface, blend);
        }
    }

    /// Current weather.
    #[must_use]
    pub fn kind(&self) -> WeatherKind {
        self.kind
    }

    /// Live particles.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Pool bound for the current kind.
    #[must_use]
    pub fn max_particles(&self) -> usize {
        self.max_particles
    }

    /// -1, 0 or 1.
    #[must_use]
    pub fn wind_direction(&self) -> f32 {
        self.wind.direction
    }

    /// Wind magnitude.
    #[must_use]
    pub fn wind_strength(&self) -> f32 {
        self.wind.strength
    }

    /// Fog veil opacity.
    #[must_use]
    pub fn fog_opacity(&self) -> f32 {
        self.fog_opacity
    }

    /// Lightning state.
    #[must_use]
    pub fn lightning(&self) -> &Lightning {
        &self.lightning
    }

    /// Whether a crossfade is running.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Crossfade progress, 0 when idle.
    #[must_use]
    pub fn transition_progress(&self) -> f32 {
        self.transition.map_or(0.0, |fade| fade.progress())
    }

    /// Kind being faded to.
    #[must_use]
    pub fn transition_target(&self) -> Option<WeatherKind> {
        self.transition.map(|fade| fade.target())
    }

    /// Auto-cycle settings.
    #[must_use]
    pub fn auto_cycle(&self) -> &AutoCycle {
        &self.auto_cycle
    }

    /// Thunder cues actually played.
    #[must_use]
    pub fn thunder_cues(&self) -> u64 {
        self.thunder_cues
    }
}
