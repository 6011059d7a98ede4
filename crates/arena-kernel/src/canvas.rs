//! CPU raster canvas.
//!
//! A software implementation of [`Surface`] on top of an `image::RgbaImage`.
//! Shapes are rasterised without anti-aliasing: a pixel is covered when its
//! centre is inside the shape. Blending is source-over with straight alpha.

use std::ops::Range;
use std::path::Path as FsPath;

use arena_common::Color;
use glam::Vec2;
use image::{ImageResult, Rgba, RgbaImage};
use tracing::debug;

use crate::path::Path;
use crate::raster::Raster;
use crate::surface::{Paint, Surface};

/// A software-rendered RGBA canvas.
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: RgbaImage,
    global_alpha: f32,
}

/// One polygon edge prepared for scanline filling.
#[derive(Debug, Clone, Copy)]
struct Edge {
    top: Vec2,
    bottom: Vec2,
    winding: i32,
}

impl Canvas {
    /// Creates a fully transparent canvas.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            global_alpha: 1.0,
        }
    }

    /// Overwrites every pixel with `color`, ignoring global alpha.
    pub fn clear(&mut self, color: Color) {
        let alpha = (color.opacity() * 255.0).round() as u8;
        for px in self.pixels.pixels_mut() {
            *px = Rgba([color.r, color.g, color.b, alpha]);
        }
    }

    /// Color of the pixel at `(x, y)`.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let Rgba([r, g, b, a]) = *self.pixels.get_pixel(x, y);
        Color::rgba(r, g, b, f32::from(a) / 255.0)
    }

    /// Consumes the canvas, returning its contents.
    #[must_use]
    pub fn into_raster(self) -> Raster {
        Raster::new(self.pixels)
    }

    /// Writes the canvas as a PNG file.
    pub fn save_png<P: AsRef<FsPath>>(&self, path: P) -> ImageResult<()> {
        let path = path.as_ref();
        self.pixels.save_with_format(path, image::ImageFormat::Png)?;
        debug!("Saved canvas snapshot to {}", path.display());
        Ok(())
    }

    /// Pixel indices whose centres fall in `[lo, hi)`, clipped to `0..limit`.
    fn span(lo: f32, hi: f32, limit: u32) -> Range<u32> {
        let start = (lo - 0.5).ceil().max(0.0);
        let end = (hi - 0.5).ceil().min(limit as f32);
        if end <= start {
            return 0..0;
        }
        start as u32..end as u32
    }

    fn blend_pixel(&mut self, x: u32, y: u32, color: Color) {
        let src_a = color.opacity() * self.global_alpha;
        if src_a <= 0.0 {
            return;
        }
        let dst = self.pixels.get_pixel_mut(x, y);
        let dst_a = f32::from(dst[3]) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            *dst = Rgba([0, 0, 0, 0]);
            return;
        }
        let mix = |s: u8, d: u8| {
            ((f32::from(s) * src_a + f32::from(d) * dst_a * (1.0 - src_a)) / out_a)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        *dst = Rgba([
            mix(color.r, dst[0]),
            mix(color.g, dst[1]),
            mix(color.b, dst[2]),
            (out_a * 255.0).round() as u8,
        ]);
    }

    fn fill_span(&mut self, y: u32, xs: Range<u32>, paint: &Paint) {
        match paint.as_solid() {
            Some(color) => {
                for x in xs {
                    self.blend_pixel(x, y, color);
                }
            },
            None => {
                for x in xs {
                    let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                    self.blend_pixel(x, y, paint.color_at(center));
                }
            },
        }
    }

    /// Scanline fill of a set of polygon edges with the non-zero rule.
    fn fill_edges(&mut self, edges: &[Edge], paint: &Paint) {
        let Some((min_y, max_y)) = edges.iter().fold(None, |acc: Option<(f32, f32)>, e| {
            let (lo, hi) = acc.unwrap_or((e.top.y, e.bottom.y));
            Some((lo.min(e.top.y), hi.max(e.bottom.y)))
        }) else {
            return;
        };

        let (w, h) = self.pixels.dimensions();
        let mut crossings: Vec<(f32, i32)> = Vec::new();
        for y in Self::span(min_y, max_y, h) {
            let sy = y as f32 + 0.5;
            crossings.clear();
            for e in edges {
                if sy >= e.top.y && sy < e.bottom.y {
                    let t = (sy - e.top.y) / (e.bottom.y - e.top.y);
                    crossings.push((e.top.x + t * (e.bottom.x - e.top.x), e.winding));
                }
            }
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0;
            let mut start = 0.0;
            for &(x, dir) in &crossings {
                let was_inside = winding != 0;
                winding += dir;
                if !was_inside && winding != 0 {
                    start = x;
                } else if was_inside && winding == 0 {
                    let xs = Self::span(start, x, w);
                    self.fill_span(y, xs, paint);
                }
            }
        }
    }

    fn polygon_edges(points: impl IntoIterator<Item = (Vec2, Vec2)>) -> Vec<Edge> {
        points
            .into_iter()
            .filter(|(a, b)| (a.y - b.y).abs() > f32::EPSILON)
            .map(|(a, b)| {
                if a.y < b.y {
                    Edge {
                        top: a,
                        bottom: b,
                        winding: 1,
                    }
                } else {
                    Edge {
                        top: b,
                        bottom: a,
                        winding: -1,
                    }
                }
            })
            .collect()
    }
}

impl Surface for Canvas {
    fn width(&self) -> f32 {
        self.pixels.width() as f32
    }

    fn height(&self) -> f32 {
        self.pixels.height() as f32
    }

    fn global_alpha(&self) -> f32 {
        self.global_alpha
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.global_alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: &Paint) {
        let (cw, ch) = self.pixels.dimensions();
        let xs = Self::span(x.min(x + w), x.max(x + w), cw);
        for py in Self::span(y.min(y + h), y.max(y + h), ch) {
            self.fill_span(py, xs.clone(), paint);
        }
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        let edges = Self::polygon_edges(path.subpaths().iter().flat_map(|s| s.polygon_edges()));
        self.fill_edges(&edges, paint);
    }

    fn stroke_path(&mut self, path: &Path, color: Color, line_width: f32) {
        let half = line_width.max(1.0) * 0.5;
        let paint = Paint::Solid(color);
        for sub in path.subpaths() {
            for (a, b) in sub.segments() {
                let dir = b - a;
                if dir.length_squared() <= f32::EPSILON {
                    continue;
                }
                let normal = dir.perp().normalize() * half;
                let quad = [a + normal, b + normal, b - normal, a - normal];
                let edges = Self::polygon_edges((0..4).map(|i| (quad[i], quad[(i + 1) % 4])));
                self.fill_edges(&edges, &paint);
            }
        }
    }

    fn draw_image(&mut self, image: &Raster, x: f32, y: f32, w: f32, h: f32) {
        if w <= 0.0 || h <= 0.0 || image.width() == 0 || image.height() == 0 {
            return;
        }
        let (cw, ch) = self.pixels.dimensions();
        let (iw, ih) = (image.width() as f32, image.height() as f32);
        let xs = Self::span(x, x + w, cw);
        for py in Self::span(y, y + h, ch) {
            let v = (((py as f32 + 0.5 - y) / h) * ih) as u32;
            for px in xs.clone() {
                let u = (((px as f32 + 0.5 - x) / w) * iw) as u32;
                let color = image.color_at(u, v);
                self.blend_pixel(px, py, color);
            }
        }
    }
}
