//! Vector paths.
//!
//! Paths are built with canvas-style commands and flattened to polylines as
//! they are built, so surfaces only ever see straight segments.

use std::f32::consts::TAU;

use glam::Vec2;

/// Segments used for a quadratic curve.
const QUAD_SEGMENTS: usize = 12;

/// Approximate arc length in pixels covered by one flattened arc segment.
const ARC_SEGMENT_LENGTH: f32 = 4.0;

/// Minimum number of segments for an arc.
const MIN_ARC_SEGMENTS: usize = 8;

/// A flattened polyline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Subpath {
    /// Vertices in drawing order.
    pub points: Vec<Vec2>,
    /// Whether `close` was called on this subpath.
    pub closed: bool,
}

impl Subpath {
    /// Segments of the polyline, including the closing edge when `closed`.
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let closing = if self.closed && self.points.len() > 2 {
            self.points.last().copied().zip(self.points.first().copied())
        } else {
            None
        };
        self.points
            .windows(2)
            .map(|w| (w[0], w[1]))
            .chain(closing)
    }

    /// Edges of the polygon this subpath encloses (always closed).
    pub fn polygon_edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let closing = if self.points.len() > 2 {
            self.points.last().copied().zip(self.points.first().copied())
        } else {
            None
        };
        self.points
            .windows(2)
            .map(|w| (w[0], w[1]))
            .chain(closing)
    }
}

/// A set of flattened subpaths.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    subpaths: Vec<Subpath>,
}

impl Path {
    /// Starts building a path.
    #[must_use]
    pub fn builder() -> PathBuilder {
        PathBuilder::default()
    }

    /// Closed polygon through `points`.
    #[must_use]
    pub fn polygon(points: &[Vec2]) -> Self {
        let mut builder = PathBuilder::default();
        for (i, p) in points.iter().enumerate() {
            if i == 0 {
                builder.move_to(*p);
            } else {
                builder.line_to(*p);
            }
        }
        builder.close();
        builder.build()
    }

    /// Full circle.
    #[must_use]
    pub fn circle(center: Vec2, radius: f32) -> Self {
        let mut builder = PathBuilder::default();
        builder.arc(center, radius, 0.0, TAU);
        builder.close();
        builder.build()
    }

    /// Flattened subpaths.
    #[must_use]
    pub fn subpaths(&self) -> &[Subpath] {
        &self.subpaths
    }

    /// Whether the path has no drawable geometry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subpaths.iter().all(|s| s.points.len() < 2)
    }

    /// Axis-aligned bounds `(min, max)`, or `None` for an empty path.
    #[must_use]
    pub fn bounds(&self) -> Option<(Vec2, Vec2)> {
        let mut points = self.subpaths.iter().flat_map(|s| s.points.iter().copied());
        let first = points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

/// Canvas-style path builder.
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    subpaths: Vec<Subpath>,
    current: Subpath,
}

impl PathBuilder {
    /// Starts a new subpath at `p`.
    pub fn move_to(&mut self, p: Vec2) -> &mut Self {
        self.flush();
        self.current.points.push(p);
        self
    }

    /// Straight segment to `p`. Acts as `move_to` on an empty subpath.
    pub fn line_to(&mut self, p: Vec2) -> &mut Self {
        self.current.points.push(p);
        self
    }

    /// Quadratic Bézier curve through control point `ctrl` to `end`.
    pub fn quad_to(&mut self, ctrl: Vec2, end: Vec2) -> &mut Self {
        let Some(&start) = self.current.points.last() else {
            self.current.points.push(ctrl);
            return self.quad_to(ctrl, end);
        };
        for i in 1..=QUAD_SEGMENTS {
            let t = i as f32 / QUAD_SEGMENTS as f32;
            let u = 1.0 - t;
            self.current
                .points
                .push(start * (u * u) + ctrl * (2.0 * u * t) + end * (t * t));
        }
        self
    }

    /// Clockwise arc (in screen space) from angle `start` to `end` radians.
    ///
    /// The current point is connected to the arc's first point with a
    /// straight segment.
    pub fn arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32) -> &mut Self {
        let sweep = end - start;
        let steps = ((radius.abs() * sweep.abs() / ARC_SEGMENT_LENGTH).ceil() as usize)
            .max(MIN_ARC_SEGMENTS);
        for i in 0..=steps {
            let angle = start + sweep * (i as f32 / steps as f32);
            self.current
                .points
                .push(center + Vec2::new(angle.cos(), angle.sin()) * radius);
        }
        self
    }

    /// Closes the current subpath. Drawing continues from its first point.
    pub fn close(&mut self) -> &mut Self {
        let first = self.current.points.first().copied();
        self.current.closed = true;
        self.flush();
        if let Some(p) = first {
            self.current.points.push(p);
        }
        self
    }

    /// Finishes the path.
    #[must_use]
    pub fn build(&mut self) -> Path {
        self.flush();
        Path {
            subpaths: std::mem::take(&mut self.subpaths),
        }
    }

    fn flush(&mut self) {
        let sub = std::mem::take(&mut self.current);
        if sub.points.len() > 1 {
            self.subpaths.push(sub);
        }
    }
}
