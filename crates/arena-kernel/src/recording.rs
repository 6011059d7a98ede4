//! A surface that records draw calls.
//!
//! Useful wherever draw order and per-call alpha matter more than pixels,
//! such as asserting crossfade alphas or the seamless-scroll double blit.

use arena_common::Color;
use glam::Vec2;

use crate::path::Path;
use crate::raster::Raster;
use crate::surface::{Paint, Surface};

/// One recorded drawing operation, with the global alpha in effect.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    /// [`Surface::fill_rect`].
    FillRect {
        /// Left edge.
        x: f32,
        /// Top edge.
        y: f32,
        /// Width.
        w: f32,
        /// Height.
        h: f32,
        /// Fill.
        paint: Paint,
        /// Global alpha at call time.
        alpha: f32,
    },
    /// [`Surface::fill_path`].
    FillPath {
        /// Geometry.
        path: Path,
        /// Fill.
        paint: Paint,
        /// Global alpha at call time.
        alpha: f32,
    },
    /// [`Surface::stroke_path`].
    StrokePath {
        /// Geometry.
        path: Path,
        /// Stroke color.
        color: Color,
        /// Stroke width.
        line_width: f32,
        /// Global alpha at call time.
        alpha: f32,
    },
    /// [`Surface::fill_circle`].
    FillCircle {
        /// Centre.
        center: Vec2,
        /// Radius.
        radius: f32,
        /// Fill.
        paint: Paint,
        /// Global alpha at call time.
        alpha: f32,
    },
    /// [`Surface::draw_line`].
    Line {
        /// Start point.
        from: Vec2,
        /// End point.
        to: Vec2,
        /// Stroke color.
        color: Color,
        /// Stroke width.
        line_width: f32,
        /// Global alpha at call time.
        alpha: f32,
    },
    /// [`Surface::draw_image`].
    Image {
        /// Source image.
        image: Raster,
        /// Destination left edge.
        x: f32,
        /// Destination top edge.
        y: f32,
        /// Destination width.
        w: f32,
        /// Destination height.
        h: f32,
        /// Global alpha at call time.
        alpha: f32,
    },
}

impl DrawCall {
    /// Global alpha that was in effect for this call.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        match self {
            Self::FillRect { alpha, .. }
            | Self::FillPath { alpha, .. }
            | Self::StrokePath { alpha, .. }
            | Self::FillCircle { alpha, .. }
            | Self::Line { alpha, .. }
            | Self::Image { alpha, .. } => *alpha,
        }
    }
}

/// [`Surface`] implementation that stores every call.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f32,
    height: f32,
    global_alpha: f32,
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    /// Creates an empty recorder of the given size.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            global_alpha: 1.0,
            calls: Vec::new(),
        }
    }

    /// Calls recorded so far.
    #[must_use]
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Removes and returns the recorded calls.
    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    /// Recorded image blits as `(x, alpha)` pairs.
    #[must_use]
    pub fn image_blits(&self) -> Vec<(f32, f32)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Image { x, alpha, .. } => Some((*x, *alpha)),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn global_alpha(&self) -> f32 {
        self.global_alpha
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.global_alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: &Paint) {
        self.calls.push(DrawCall::FillRect {
            x,
            y,
            w,
            h,
            paint: paint.clone(),
            alpha: self.global_alpha,
        });
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        self.calls.push(DrawCall::FillPath {
            path: path.clone(),
            paint: paint.clone(),
            alpha: self.global_alpha,
        });
    }

    fn stroke_path(&mut self, path: &Path, color: Color, line_width: f32) {
        self.calls.push(DrawCall::StrokePath {
            path: path.clone(),
            color,
            line_width,
            alpha: self.global_alpha,
        });
    }

    fn draw_image(&mut self, image: &Raster, x: f32, y: f32, w: f32, h: f32) {
        self.calls.push(DrawCall::Image {
            image: image.clone(),
            x,
            y,
            w,
            h,
            alpha: self.global_alpha,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        self.calls.push(DrawCall::FillCircle {
            center,
            radius,
            paint: paint.clone(),
            alpha: self.global_alpha,
        });
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color, line_width: f32) {
        self.calls.push(DrawCall::Line {
            from,
            to,
            color,
            line_width,
            alpha: self.global_alpha,
        });
    }
}
