//! Shared RGBA image handle.

use std::fmt;
use std::sync::Arc;

use arena_common::Color;
use image::{Rgba, RgbaImage};

/// An immutable RGBA image that is cheap to clone.
///
/// Loaded layer art and synthesized placeholders are both rasters; a layer
/// that falls back to its placeholder simply holds another handle to it.
#[derive(Clone)]
pub struct Raster {
    image: Arc<RgbaImage>,
}

impl Raster {
    /// Wraps an image.
    #[must_use]
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image: Arc::new(image),
        }
    }

    /// Creates a raster filled with a single color.
    #[must_use]
    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        let alpha = (color.opacity() * 255.0).round() as u8;
        Self::new(RgbaImage::from_pixel(
            width,
            height,
            Rgba([color.r, color.g, color.b, alpha]),
        ))
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Pixel at `(x, y)` as a color. Out-of-range coordinates are clamped.
    #[must_use]
    pub fn color_at(&self, x: u32, y: u32) -> Color {
        let x = x.min(self.width().saturating_sub(1));
        let y = y.min(self.height().saturating_sub(1));
        let Rgba([r, g, b, a]) = *self.image.get_pixel(x, y);
        Color::rgba(r, g, b, f32::from(a) / 255.0)
    }

    /// Whether both handles point at the same allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.image, &other.image)
    }
}

impl PartialEq for Raster {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.image == *other.image
    }
}

impl fmt::Debug for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}
