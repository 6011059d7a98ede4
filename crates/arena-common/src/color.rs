//! Color type used by every drawing path.
//!
//! Channels are stored as 8-bit RGB plus a floating point alpha, matching the
//! `rgba(r, g, b, a)` notation used throughout the stage art.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color '{0}': expected #rrggbb")]
pub struct ColorParseError(pub String);

/// An RGB color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr", into = "ColorRepr")]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Opacity (0.0-1.0).
    pub a: f32,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0.0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Creates a color with the given opacity.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parses a `#rrggbb` hex string.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits = hex
            .strip_prefix('#')
            .filter(|d| d.len() == 6 && d.is_ascii())
            .ok_or_else(|| ColorParseError(hex.to_string()))?;

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ColorParseError(hex.to_string()))
        };

        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Formats the RGB part as `#rrggbb`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Returns the same color with a different opacity.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Adds `amount` to every channel, clamping to 0..=255. Alpha is kept.
    #[must_use]
    pub fn adjust(self, amount: i16) -> Self {
        let shift = |c: u8| (i16::from(c) + amount).clamp(0, 255) as u8;
        Self {
            r: shift(self.r),
            g: shift(self.g),
            b: shift(self.b),
            a: self.a,
        }
    }

    /// Brightens every channel by `amount`.
    #[must_use]
    pub fn lighten(self, amount: u8) -> Self {
        self.adjust(i16::from(amount))
    }

    /// Darkens every channel by `amount`.
    #[must_use]
    pub fn darken(self, amount: u8) -> Self {
        self.adjust(-i16::from(amount))
    }

    /// Linear mix between `self` (ratio 0) and `other` (ratio 1).
    #[must_use]
    pub fn blend(self, other: Self, ratio: f32) -> Self {
        let t = ratio.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f32::from(a) * (1.0 - t) + f32::from(b) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a * (1.0 - t) + other.a * t,
        }
    }

    /// Alpha clamped into the valid range.
    #[must_use]
    pub fn opacity(self) -> f32 {
        self.a.clamp(0.0, 1.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// On-disk representation: either `"#rrggbb"` or `{ r, g, b, a }`.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Hex(String),
    Channels {
        r: u8,
        g: u8,
        b: u8,
        #[serde(default = "opaque")]
        a: f32,
    },
}

fn opaque() -> f32 {
    1.0
}

impl TryFrom<ColorRepr> for Color {
    type Error = ColorParseError;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Hex(hex) => Self::from_hex(&hex),
            ColorRepr::Channels { r, g, b, a } => Ok(Self::rgba(r, g, b, a)),
        }
    }
}

impl From<Color> for ColorRepr {
    fn from(color: Color) -> Self {
        if (color.a - 1.0).abs() < f32::EPSILON {
            Self::Hex(color.to_hex())
        } else {
            Self::Channels {
                r: color.r,
                g: color.g,
                b: color.b,
                a: color.a,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(
            Color::from_hex("#87ceeb").expect("valid"),
            Color::rgb(0x87, 0xce, 0xeb)
        );
        assert!(Color::from_hex("87ceeb").is_err());
        assert!(Color::from_hex("#87ce").is_err());
        assert!(Color::from_hex("#zzzzzz").is_err());
    }

    #[test]
    fn test_adjust_clamps() {
        let c = Color::rgb(250, 10, 128);
        assert_eq!(c.lighten(30), Color::rgb(255, 40, 158));
        assert_eq!(c.darken(20), Color::rgb(230, 0, 108));
    }

    #[test]
    fn test_blend_endpoints() {
        let sky = Color::from_hex("#4a6a8a").expect("valid");
        let floor = Color::from_hex("#5d4b35").expect("valid");
        assert_eq!(sky.blend(floor, 0.0), sky);
        assert_eq!(sky.blend(floor, 1.0), floor);
        assert_eq!(sky.blend(floor, 0.5), Color::rgb(0x54, 0x5b, 0x60));
    }

    #[test]
    fn test_serde_roundtrip_forms() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            solid: Color,
            tint: Color,
        }

        let text = "solid = \"#ff9632\"\ntint = { r = 0, g = 20, b = 50, a = 0.5 }\n";
        let parsed: Wrapper = toml::from_str(text).expect("parse");
        assert_eq!(parsed.solid, Color::rgb(255, 150, 50));
        assert_eq!(parsed.tint, Color::rgba(0, 20, 50, 0.5));

        let out = toml::to_string(&parsed).expect("serialize");
        assert!(out.contains("#ff9632"));
    }

    proptest! {
        #[test]
        fn prop_adjust_never_wraps(r in any::<u8>(), g in any::<u8>(), b in any::<u8>(), amount in -300i16..300) {
            let c = Color::rgb(r, g, b).adjust(amount);
            if amount >= 0 {
                prop_assert!(c.r >= r && c.g >= g && c.b >= b);
            } else {
                prop_assert!(c.r <= r && c.g <= g && c.b <= b);
            }
        }
    }
}
