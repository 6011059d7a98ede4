//! Scene catalog and time-of-day tints.
//!
//! Every scene is an immutable [`SceneProfile`] looked up by [`SceneKind`];
//! there is no string-keyed dispatch past the parsing boundary.

use std::fmt;
use std::str::FromStr;

use arena_common::{Color, StageError};
use serde::{Deserialize, Serialize};

/// The stages a fight can take place on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    /// Indoor training hall.
    #[default]
    Dojo,
    /// Mountain range.
    Mountain,
    /// City rooftops.
    City,
    /// Beach with ocean and palms.
    Beach,
    /// Forest at night.
    Forest,
}

impl SceneKind {
    /// Every scene, in catalog order.
    pub const ALL: [Self; 5] = [
        Self::Dojo,
        Self::Mountain,
        Self::City,
        Self::Beach,
        Self::Forest,
    ];

    /// Catalog name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dojo => "dojo",
            Self::Mountain => "mountain",
            Self::City => "city",
            Self::Beach => "beach",
            Self::Forest => "forest",
        }
    }

    /// Position in [`SceneKind::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Immutable catalog entry for this scene.
    #[must_use]
    pub fn profile(self) -> &'static SceneProfile {
        &CATALOG[self.index()]
    }
}

impl FromStr for SceneKind {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| StageError::not_found("Background", s))
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which procedural silhouette a scene's placeholders get.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    /// Gradient only.
    Plain,
    /// Jagged peaks.
    Mountain,
    /// Rectangular skyline.
    City,
    /// Waves and palm trees.
    Beach,
    /// Trunks with round crowns.
    Forest,
}

/// One image layer of a scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerSpec {
    /// Image URI.
    pub source: &'static str,
    /// Parallax coefficient: 0 is fixed, larger values scroll more.
    pub parallax: f32,
}

/// Immutable description of a scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneProfile {
    /// Which scene this is.
    pub kind: SceneKind,
    /// Layers, back to front.
    pub layers: &'static [LayerSpec],
    /// Distance from the bottom of the screen to the floor.
    pub floor_height: f32,
    /// Dominant sky color.
    pub sky_color: Color,
    /// Dominant floor color.
    pub floor_color: Color,
    /// Placeholder silhouette style.
    pub theme: Theme,
}

const fn layer(source: &'static str, parallax: f32) -> LayerSpec {
    LayerSpec { source, parallax }
}

static CATALOG: [SceneProfile; 5] = [
    SceneProfile {
        kind: SceneKind::Dojo,
        layers: &[
            layer("/assets/backgrounds/dojo-bg.png", 0.0),
            layer("/assets/backgrounds/dojo-floor.png", 0.1),
        ],
        floor_height: 50.0,
        sky_color: Color::rgb(0x1a, 0x2a, 0x3a),
        floor_color: Color::rgb(0x55, 0x44, 0x33),
        theme: Theme::Plain,
    },
    SceneProfile {
        kind: SceneKind::Mountain,
        layers: &[
            layer("/assets/backgrounds/mountain-sky.png", 0.0),
            layer("/assets/backgrounds/mountain-far.png", 0.1),
            layer("/assets/backgrounds/mountain-mid.png", 0.2),
            layer("/assets/backgrounds/mountain-ground.png", 0.3),
        ],
        floor_height: 50.0,
        sky_color: Color::rgb(0x4a, 0x6a, 0x8a),
        floor_color: Color::rgb(0x5d, 0x4b, 0x35),
        theme: Theme::Mountain,
    },
    SceneProfile {
        kind: SceneKind::City,
        layers: &[
            layer("/assets/backgrounds/city-sky.png", 0.0),
            layer("/assets/backgrounds/city-buildings.png", 0.1),
            layer("/assets/backgrounds/city-street.png", 0.3),
        ],
        floor_height: 50.0,
        sky_color: Color::rgb(0x3a, 0x4a, 0x5a),
        floor_color: Color::rgb(0x33, 0x33, 0x33),
        theme: Theme::City,
    },
    SceneProfile {
        kind: SceneKind::Beach,
        layers: &[
            layer("/assets/backgrounds/beach-sky.png", 0.0),
            layer("/assets/backgrounds/beach-ocean.png", 0.05),
            layer("/assets/backgrounds/beach-sand.png", 0.2),
        ],
        floor_height: 50.0,
        sky_color: Color::rgb(0x87, 0xce, 0xeb),
        floor_color: Color::rgb(0xf5, 0xde, 0xb3),
        theme: Theme::Beach,
    },
    SceneProfile {
        kind: SceneKind::Forest,
        layers: &[
            layer("/assets/backgrounds/forest-sky.png", 0.0),
            layer("/assets/backgrounds/forest-trees-far.png", 0.1),
            layer("/assets/backgrounds/forest-trees-near.png", 0.2),
            layer("/assets/backgrounds/forest-ground.png", 0.3),
        ],
        floor_height: 50.0,
        sky_color: Color::rgb(0x0a, 0x1a, 0x2a),
        floor_color: Color::rgb(0x2a, 0x1a, 0x0a),
        theme: Theme::Forest,
    },
];

/// Time-of-day phase, applied as a full-screen tint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    /// No tint.
    #[default]
    Day,
    /// Warm orange.
    Sunset,
    /// Dark blue.
    Night,
    /// Soft violet.
    Dawn,
}

impl TimeOfDay {
    /// Every phase.
    pub const ALL: [Self; 4] = [Self::Day, Self::Sunset, Self::Night, Self::Dawn];

    /// Phase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Sunset => "sunset",
            Self::Night => "night",
            Self::Dawn => "dawn",
        }
    }

    /// Overlay color drawn over the whole scene, if any.
    #[must_use]
    pub const fn overlay(self) -> Option<Color> {
        match self {
            Self::Day => None,
            Self::Sunset => Some(Color::rgba(255, 150, 50, 0.3)),
            Self::Night => Some(Color::rgba(0, 20, 50, 0.5)),
            Self::Dawn => Some(Color::rgba(150, 120, 200, 0.3)),
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| StageError::not_found("Time of day", s))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_indexed_by_kind() {
        for kind in SceneKind::ALL {
            assert_eq!(kind.profile().kind, kind);
            assert!(!kind.profile().layers.is_empty());
            assert_eq!(kind.profile().layers[0].parallax, 0.0);
        }
    }

    #[test]
    fn test_scene_names_round_trip() {
        for kind in SceneKind::ALL {
            assert_eq!(kind.as_str().parse::<SceneKind>().expect("known"), kind);
        }
        let err = "volcano".parse::<SceneKind>().expect_err("unknown");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_layer_counts_match_catalog() {
        let counts: Vec<usize> = SceneKind::ALL
            .iter()
            .map(|k| k.profile().layers.len())
            .collect();
        assert_eq!(counts, vec![2, 4, 3, 3, 4]);
    }

    #[test]
    fn test_time_of_day_overlays() {
        assert_eq!(TimeOfDay::Day.overlay(), None);
        assert_eq!(TimeOfDay::Night.overlay().map(|c| c.a), Some(0.5));
        assert_eq!("dawn".parse::<TimeOfDay>().expect("known"), TimeOfDay::Dawn);
        assert!("dusk".parse::<TimeOfDay>().is_err());
    }
}
