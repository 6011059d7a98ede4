//! Weather particles.
//!
//! Particles have no identity across frames: the overlay removes the ones
//! that leave the screen and tops the pool back up with fresh spawns.

use std::f32::consts::TAU;

use arena_common::{Color, RandomSource};
use arena_kernel::{Paint, Surface};
use glam::Vec2;

use crate::weather::{WeatherKind, Wind};

/// Rain and storm streak color.
pub const RAIN_COLOR: Color = Color::rgb(200, 230, 255);

/// Snowflake color.
pub const SNOW_COLOR: Color = Color::WHITE;

/// Fog blob centre color.
pub const FOG_BLOB_COLOR: Color = Color::rgb(230, 240, 245);

/// Sideways wobble of a snowflake, in pixels per update. Unlike the other
/// displacements it is not scaled by the frame factor.
pub const WOBBLE_AMPLITUDE: f32 = 2.0;

/// Kind-specific particle state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticleShape {
    /// Rain or storm drop drawn as a line.
    Streak {
        /// Line length.
        length: f32,
    },
    /// Snowflake drawn as a filled circle.
    Flake {
        /// Current wobble phase in radians.
        wobble_phase: f32,
        /// Phase advance per reference frame.
        wobble_speed: f32,
    },
    /// Fog drawn as a radial gradient fading to transparent.
    Blob,
}

/// One particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position in pixels.
    pub position: Vec2,
    /// Line width, flake radius or blob radius.
    pub size: f32,
    /// Vertical speed per reference frame.
    pub fall_speed: f32,
    /// Opacity before transition blending.
    pub opacity: f32,
    /// Horizontal speed per reference frame.
    pub wind_drift: f32,
    /// Kind-specific state.
    pub shape: ParticleShape,
}

impl Particle {
    /// Spawns a particle of `kind` on a `width` x `height` screen. Returns
    /// `None` for [`WeatherKind::None`].
    pub fn spawn(
        kind: WeatherKind,
        wind: Wind,
        width: f32,
        height: f32,
        rng: &mut dyn RandomSource,
    ) -> Option<Self> {
        let x = rng.range(0.0, width);
        let particle = match kind {
            WeatherKind::None => return None,
            WeatherKind::Rain => Self {
                position: Vec2::new(x, -rng.range(0.0, 100.0)),
                size: rng.range(1.0, 2.0),
                fall_speed: rng.range(10.0, 20.0),
                wind_drift: wind.velocity(),
                shape: ParticleShape::Streak {
                    length: rng.range(10.0, 30.0),
                },
                opacity: rng.range(0.6, 1.0),
            },
            WeatherKind::Snow => Self {
                position: Vec2::new(x, -rng.range(0.0, 50.0)),
                size: rng.range(2.0, 5.0),
                fall_speed: rng.range(1.0, 3.0),
                wind_drift: wind.velocity(),
                shape: ParticleShape::Flake {
                    wobble_speed: rng.range(0.01, 0.06),
                    wobble_phase: rng.range(0.0, TAU),
                },
                opacity: rng.range(0.7, 1.0),
            },
            WeatherKind::Storm => Self {
                position: Vec2::new(x, -rng.range(0.0, 100.0)),
                size: rng.range(1.0, 3.0),
                fall_speed: rng.range(15.0, 30.0),
                wind_drift: wind.velocity(),
                shape: ParticleShape::Streak {
                    length: rng.range(15.0, 40.0),
                },
                opacity: rng.range(0.5, 1.0),
            },
            WeatherKind::Fog => {
                let y = height - 50.0 - rng.range(0.0, 100.0);
                let size = rng.range(50.0, 150.0);
                let speed = rng.range(0.2, 0.5);
                Self {
                    position: Vec2::new(x, y),
                    size,
                    fall_speed: 0.0,
                    wind_drift: speed * rng.sign(),
                    shape: ParticleShape::Blob,
                    opacity: rng.range(0.05, 0.15),
                }
            },
        };
        Some(particle)
    }

    /// Advances the particle by `factor` reference frames. Returns true when
    /// it has fallen past the bottom edge and should be replaced. Fog blobs
    /// wrap around the sides instead.
    pub fn step(&mut self, factor: f32, width: f32, height: f32) -> bool {
        match &mut self.shape {
            ParticleShape::Streak { .. } => {
                self.position.y += self.fall_speed * factor;
                self.position.x += self.wind_drift * factor;
                self.position.y > height
            },
            ParticleShape::Flake {
                wobble_phase,
                wobble_speed,
            } => {
                self.position.y += self.fall_speed * factor;
                *wobble_phase += *wobble_speed * factor;
                self.position.x +=
                    self.wind_drift * factor + wobble_phase.sin() * WOBBLE_AMPLITUDE;
                self.position.y > height
            },
            ParticleShape::Blob => {
                self.position.x += self.wind_drift * factor;
                if self.position.x > width + self.size {
                    self.position.x = -self.size;
                } else if self.position.x < -self.size {
                    self.position.x = width + self.size;
                }
                false
            },
        }
    }

    /// Draws the particle with its opacity scaled by `blend`. Nothing is
    /// drawn when the result is not positive.
    pub fn draw(&self, surface: &mut dyn Surface, blend: f32) {
        let alpha = self.opacity * blend;
        if alpha <= 0.0 {
            return;
        }
        match self.shape {
            ParticleShape::Streak { length } => {
                let tail = self.position + Vec2::new(self.wind_drift * 0.5, length);
                surface.draw_line(self.position, tail, RAIN_COLOR.with_alpha(alpha), self.size);
            },
            ParticleShape::Flake { .. } => {
                surface.fill_circle(
                    self.position,
                    self.size,
                    &Paint::Solid(SNOW_COLOR.with_alpha(alpha)),
                );
            },
            ParticleShape::Blob => {
                let paint = Paint::radial(
                    self.position,
                    0.0,
                    self.size,
                    [
                        (0.0, FOG_BLOB_COLOR.with_alpha(alpha)),
                        (1.0, FOG_BLOB_COLOR.with_alpha(0.0)),
                    ],
                );
                surface.fill_circle(self.position, self.size, &paint);
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FixedRandom;
    use arena_common::SeededRandom;
    use arena_kernel::{DrawCall, RecordingSurface};
    use proptest::prelude::*;

    const WIND: Wind = Wind {
        direction: 1.0,
        strength: 2.0,
    };

    #[test]
    fn test_spawn_ranges() {
        let mut rng = SeededRandom::with_seed(11);
        for _ in 0..200 {
            let rain = Particle::spawn(WeatherKind::Rain, WIND, 800.0, 600.0, &mut rng)
                .expect("rain spawns");
            assert!((-100.0..=0.0).contains(&rain.position.y));
            assert!((10.0..20.0).contains(&rain.fall_speed));
            assert_eq!(rain.wind_drift, 2.0);

            let fog = Particle::spawn(WeatherKind::Fog, Wind::default(), 800.0, 600.0, &mut rng)
                .expect("fog spawns");
            assert!((450.0..=550.0).contains(&fog.position.y));
            assert!((0.2..0.5).contains(&fog.wind_drift.abs()));
            assert!((0.05..0.15).contains(&fog.opacity));
        }
        assert!(Particle::spawn(WeatherKind::None, WIND, 800.0, 600.0, &mut rng).is_none());
    }

    #[test]
    fn test_rain_falls_and_exits() {
        let mut drop = Particle::spawn(WeatherKind::Rain, WIND, 800.0, 600.0, &mut FixedRandom(0.5))
            .expect("rain spawns");
        let start = drop.position;
        assert!(!drop.step(1.0, 800.0, 600.0));
        assert_eq!(drop.position - start, Vec2::new(2.0, 15.0));

        let mut frames = 0;
        while !drop.step(1.0, 800.0, 600.0) {
            frames += 1;
            assert!(frames < 100);
        }
        assert!(drop.position.y > 600.0);
    }

    #[test]
    fn test_snow_wobble_is_bounded_per_update() {
        let mut flake = Particle {
            position: Vec2::new(400.0, 0.0),
            size: 3.0,
            fall_speed: 2.0,
            opacity: 1.0,
            wind_drift: 0.0,
            shape: ParticleShape::Flake {
                wobble_phase: 0.0,
                wobble_speed: 0.05,
            },
        };
        // One second in a single update.
        let factor = 1000.0 / crate::crossfade::REFERENCE_FRAME_MS;
        flake.step(factor, 800.0, 600.0);
        assert!((flake.position.x - 400.0).abs() <= WOBBLE_AMPLITUDE);
        assert!((flake.position.y - 2.0 * factor).abs() < 1e-3);
    }

    #[test]
    fn test_fog_wraps_instead_of_leaving() {
        let mut blob = Particle {
            position: Vec2::new(899.0, 500.0),
            size: 100.0,
            fall_speed: 0.0,
            opacity: 0.1,
            wind_drift: 2.0,
            shape: ParticleShape::Blob,
        };
        assert!(!blob.step(1.0, 800.0, 600.0));
        assert_eq!(blob.position.x, -100.0);

        blob.wind_drift = -2.0;
        assert!(!blob.step(1.0, 800.0, 600.0));
        assert_eq!(blob.position.x, 900.0);
    }

    #[test]
    fn test_draw_visuals() {
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let mut rng = FixedRandom(0.5);
        for kind in [WeatherKind::Rain, WeatherKind::Snow, WeatherKind::Fog] {
            Particle::spawn(kind, WIND, 800.0, 600.0, &mut rng)
                .expect("spawns")
                .draw(&mut surface, 0.5);
        }
        let calls = surface.take_calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(&calls[0], DrawCall::Line { color, .. } if (color.a - 0.4).abs() < 1e-6));
        assert!(matches!(&calls[1], DrawCall::FillCircle { paint, .. } if paint.as_solid().is_some()));
        assert!(matches!(
            &calls[2],
            DrawCall::FillCircle { paint: Paint::RadialGradient { .. }, .. }
        ));
    }

    #[test]
    fn test_invisible_particles_are_skipped() {
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let flake = Particle::spawn(WeatherKind::Snow, WIND, 800.0, 600.0, &mut FixedRandom(0.5))
            .expect("snow spawns");
        flake.draw(&mut surface, 0.0);
        assert!(surface.calls().is_empty());
    }

    proptest! {
        #[test]
        fn prop_fog_stays_in_wrap_band(seed in any::<u64>(), steps in 1usize..400, factor in 0.0f32..50.0) {
            let mut rng = SeededRandom::with_seed(seed);
            let mut blob = Particle::spawn(WeatherKind::Fog, Wind::default(), 800.0, 600.0, &mut rng)
                .expect("fog spawns");
            for _ in 0..steps {
                prop_assert!(!blob.step(factor, 800.0, 600.0));
                prop_assert!(blob.position.x >= -blob.size - 0.5 * 50.0);
                prop_assert!(blob.position.x <= 800.0 + blob.size + 0.5 * 50.0);
            }
        }
    }
}
