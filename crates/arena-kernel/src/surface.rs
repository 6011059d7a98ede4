//! The drawable surface abstraction.
//!
//! Both stage engines draw exclusively through [`Surface`], so they can
//! target the CPU [`Canvas`](crate::Canvas), a
//! [`RecordingSurface`](crate::RecordingSurface) in tests, or any other
//! backend that implements the trait.

use arena_common::Color;
use glam::Vec2;

use crate::path::{Path, PathBuilder};
use crate::raster::Raster;

/// A color stop inside a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient (0.0-1.0).
    pub offset: f32,
    /// Color at this position.
    pub color: Color,
}

/// How a filled shape is colored.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// One color everywhere.
    Solid(Color),
    /// Color varies along the line from `start` to `end`.
    LinearGradient {
        /// Where offset 0.0 lies.
        start: Vec2,
        /// Where offset 1.0 lies.
        end: Vec2,
        /// Stops sorted by offset.
        stops: Vec<GradientStop>,
    },
    /// Color varies with distance from `center`.
    RadialGradient {
        /// Shared centre of both circles.
        center: Vec2,
        /// Radius at offset 0.0.
        inner_radius: f32,
        /// Radius at offset 1.0.
        outer_radius: f32,
        /// Stops sorted by offset.
        stops: Vec<GradientStop>,
    },
}

impl Paint {
    /// Linear gradient from `(offset, color)` pairs.
    #[must_use]
    pub fn linear(start: Vec2, end: Vec2, stops: impl IntoIterator<Item = (f32, Color)>) -> Self {
        Self::LinearGradient {
            start,
            end,
            stops: sorted_stops(stops),
        }
    }

    /// Radial gradient from `(offset, color)` pairs.
    #[must_use]
    pub fn radial(
        center: Vec2,
        inner_radius: f32,
        outer_radius: f32,
        stops: impl IntoIterator<Item = (f32, Color)>,
    ) -> Self {
        Self::RadialGradient {
            center,
            inner_radius,
            outer_radius,
            stops: sorted_stops(stops),
        }
    }

    /// Vertical gradient spanning `height` pixels from the top of the surface.
    #[must_use]
    pub fn vertical(height: f32, top: Color, bottom: Color) -> Self {
        Self::linear(Vec2::ZERO, Vec2::new(0.0, height), [(0.0, top), (1.0, bottom)])
    }

    /// The color this paint produces at `p`.
    #[must_use]
    pub fn color_at(&self, p: Vec2) -> Color {
        match self {
            Self::Solid(color) => *color,
            Self::LinearGradient { start, end, stops } => {
                let axis = *end - *start;
                let len_sq = axis.length_squared();
                let t = if len_sq > 0.0 {
                    (p - *start).dot(axis) / len_sq
                } else {
                    0.0
                };
                sample_stops(stops, t)
            },
            Self::RadialGradient {
                center,
                inner_radius,
                outer_radius,
                stops,
            } => {
                let span = outer_radius - inner_radius;
                let t = if span > 0.0 {
                    (p.distance(*center) - inner_radius) / span
                } else {
                    1.0
                };
                sample_stops(stops, t)
            },
        }
    }

    /// The single color of a solid paint.
    #[must_use]
    pub fn as_solid(&self) -> Option<Color> {
        match self {
            Self::Solid(color) => Some(*color),
            _ => None,
        }
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Self::Solid(color)
    }
}

fn sorted_stops(stops: impl IntoIterator<Item = (f32, Color)>) -> Vec<GradientStop> {
    let mut stops: Vec<GradientStop> = stops
        .into_iter()
        .map(|(offset, color)| GradientStop {
            offset: offset.clamp(0.0, 1.0),
            color,
        })
        .collect();
    stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
    stops
}

fn sample_stops(stops: &[GradientStop], t: f32) -> Color {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Color::TRANSPARENT;
    };
    if t <= first.offset {
        return first.color;
    }
    if t >= last.offset {
        return last.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let local = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
            return a.color.blend(b.color, local);
        }
    }
    last.color
}

/// A fixed-size 2D raster target.
///
/// Every drawing call is scaled by the current global alpha.
pub trait Surface {
    /// Width in pixels.
    fn width(&self) -> f32;

    /// Height in pixels.
    fn height(&self) -> f32;

    /// Current global alpha.
    fn global_alpha(&self) -> f32;

    /// Sets the global alpha (clamped to 0.0-1.0).
    fn set_global_alpha(&mut self, alpha: f32);

    /// Fills an axis-aligned rectangle.
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: &Paint);

    /// Fills a path using the non-zero winding rule.
    fn fill_path(&mut self, path: &Path, paint: &Paint);

    /// Strokes every segment of a path.
    fn stroke_path(&mut self, path: &Path, color: Color, line_width: f32);

    /// Draws `image` scaled into the rectangle `(x, y, w, h)`.
    fn draw_image(&mut self, image: &Raster, x: f32, y: f32, w: f32, h: f32);

    /// Fills a circle.
    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        self.fill_path(&Path::circle(center, radius), paint);
    }

    /// Strokes a single straight line.
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color, line_width: f32) {
        let path = PathBuilder::default().move_to(from).line_to(to).build();
        self.stroke_path(&path, color, line_width);
    }

    /// Fills the whole surface.
    fn fill_screen(&mut self, paint: &Paint) {
        let (w, h) = (self.width(), self.height());
        self.fill_rect(0.0, 0.0, w, h, paint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_gradient_sampling() {
        let paint = Paint::vertical(100.0, Color::BLACK, Color::WHITE);
        assert_eq!(paint.color_at(Vec2::new(5.0, -10.0)), Color::BLACK);
        assert_eq!(paint.color_at(Vec2::new(5.0, 200.0)), Color::WHITE);
        let mid = paint.color_at(Vec2::new(5.0, 50.0));
        assert_eq!((mid.r, mid.g, mid.b), (128, 128, 128));
    }

    #[test]
    fn test_radial_gradient_fades_out() {
        let inner = Color::rgba(230, 240, 245, 0.1);
        let paint = Paint::radial(
            Vec2::ZERO,
            0.0,
            10.0,
            [(0.0, inner), (1.0, inner.with_alpha(0.0))],
        );
        assert!((paint.color_at(Vec2::ZERO).a - 0.1).abs() < 1e-6);
        assert!((paint.color_at(Vec2::new(5.0, 0.0)).a - 0.05).abs() < 1e-6);
        assert_eq!(paint.color_at(Vec2::new(20.0, 0.0)).a, 0.0);
    }

    #[test]
    fn test_stops_are_sorted() {
        let paint = Paint::linear(
            Vec2::ZERO,
            Vec2::X,
            [(1.0, Color::WHITE), (0.0, Color::BLACK)],
        );
        assert_eq!(paint.color_at(Vec2::ZERO), Color::BLACK);
    }

    #[test]
    fn test_empty_gradient_is_transparent() {
        let paint = Paint::linear(Vec2::ZERO, Vec2::X, []);
        assert_eq!(paint.color_at(Vec2::ZERO), Color::TRANSPARENT);
    }
}
