//! Weather kinds and their property profiles.

use std::fmt;
use std::str::FromStr;

use arena_common::{RandomSource, StageError};
use serde::{Deserialize, Serialize};

/// Weather that can be active on the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherKind {
    /// Clear, no particles.
    #[default]
    None,
    /// Light rain streaks.
    Rain,
    /// Drifting snowflakes.
    Snow,
    /// Heavy rain with lightning.
    Storm,
    /// Low-lying fog banks.
    Fog,
}

impl WeatherKind {
    /// Every kind.
    pub const ALL: [Self; 5] = [Self::None, Self::Rain, Self::Snow, Self::Storm, Self::Fog];

    /// Weather name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Storm => "storm",
            Self::Fog => "fog",
        }
    }

    /// Fixed properties of this kind.
    #[must_use]
    pub const fn profile(self) -> WeatherProfile {
        match self {
            Self::None => WeatherProfile {
                max_particles: 0,
                wind: WindRange::Calm,
                fog_opacity: 0.0,
            },
            Self::Rain => WeatherProfile {
                max_particles: 200,
                wind: WindRange::Gusting { min: 1.0, max: 3.0 },
                fog_opacity: 0.1,
            },
            Self::Snow => WeatherProfile {
                max_particles: 150,
                wind: WindRange::Gusting { min: 0.5, max: 1.5 },
                fog_opacity: 0.15,
            },
            Self::Storm => WeatherProfile {
                max_particles: 250,
                wind: WindRange::Gusting { min: 3.0, max: 6.0 },
                fog_opacity: 0.25,
            },
            Self::Fog => WeatherProfile {
                max_particles: 50,
                wind: WindRange::Still { strength: 0.2 },
                fog_opacity: 0.4,
            },
        }
    }

    /// Whether this kind triggers lightning.
    #[must_use]
    pub const fn has_lightning(self) -> bool {
        matches!(self, Self::Storm)
    }
}

impl FromStr for WeatherKind {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| StageError::not_found("Weather type", s))
    }
}

impl fmt::Display for WeatherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How wind is chosen when a kind is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindRange {
    /// No wind.
    Calm,
    /// Random direction, strength in `[min, max)`.
    Gusting {
        /// Lower strength bound.
        min: f32,
        /// Upper strength bound.
        max: f32,
    },
    /// Direction 0 with a fixed strength.
    Still {
        /// Strength.
        strength: f32,
    },
}

/// Immutable properties of a weather kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherProfile {
    /// Particle pool bound.
    pub max_particles: usize,
    /// Wind selection rule.
    pub wind: WindRange,
    /// Opacity of the full-screen fog veil.
    pub fog_opacity: f32,
}

/// Wind rolled for an activation of a kind.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Wind {
    /// -1 blows left, 1 blows right, 0 is still.
    pub direction: f32,
    /// Magnitude.
    pub strength: f32,
}

impl Wind {
    /// Horizontal velocity per reference frame.
    #[must_use]
    pub fn velocity(self) -> f32 {
        self.direction * self.strength
    }
}

impl WeatherProfile {
    /// Rolls the wind for one activation.
    pub fn roll_wind(&self, rng: &mut dyn RandomSource) -> Wind {
        match self.wind {
            WindRange::Calm => Wind::default(),
            WindRange::Gusting { min, max } => {
                let direction = rng.sign();
                Wind {
                    direction,
                    strength: rng.range(min, max),
                }
            },
            WindRange::Still { strength } => Wind {
                direction: 0.0,
                strength,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedRandom;

    #[test]
    fn test_profiles() {
        assert_eq!(WeatherKind::None.profile().max_particles, 0);
        assert_eq!(WeatherKind::Storm.profile().max_particles, 250);
        assert_eq!(WeatherKind::Fog.profile().fog_opacity, 0.4);
        assert!(WeatherKind::Storm.has_lightning());
        assert!(!WeatherKind::Rain.has_lightning());
    }

    #[test]
    fn test_roll_wind() {
        let mut rng = ScriptedRandom::new(&[0.9, 0.5]);
        let wind = WeatherKind::Storm.profile().roll_wind(&mut rng);
        assert_eq!(wind.direction, -1.0);
        assert!((wind.strength - 4.5).abs() < 1e-6);

        let fog = WeatherKind::Fog.profile().roll_wind(&mut rng);
        assert_eq!(fog, Wind { direction: 0.0, strength: 0.2 });
        assert_eq!(fog.velocity(), 0.0);

        assert_eq!(WeatherKind::None.profile().roll_wind(&mut rng), Wind::default());
    }

    #[test]
    fn test_parse() {
        assert_eq!("snow".parse::<WeatherKind>().expect("known"), WeatherKind::Snow);
        assert!("hurricane".parse::<WeatherKind>().expect_err("unknown").is_not_found());
    }
}
