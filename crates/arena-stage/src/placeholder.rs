//! Procedural placeholder art.
//!
//! Every layer of every scene gets a synthesized stand-in: a vertical
//! gradient derived from the scene's sky and floor colors, overlaid with a
//! translucent silhouette picked by the scene's [`Theme`]. A layer whose
//! image cannot be fetched is drawn with its placeholder for the rest of the
//! session.

use std::f32::consts::PI;

use arena_common::{Color, RandomSource};
use arena_kernel::{Canvas, Paint, Path, Raster, Surface};
use glam::Vec2;

use crate::scene::{SceneProfile, Theme};

/// Draws a theme's silhouette for one layer index onto a surface.
pub type SilhouetteFn = fn(&mut dyn Surface, usize, &mut dyn RandomSource);

/// Silhouette strategy for a theme.
#[must_use]
pub fn silhouette_for(theme: Theme) -> SilhouetteFn {
    match theme {
        Theme::Plain => draw_nothing,
        Theme::Mountain => draw_mountains,
        Theme::City => draw_skyline,
        Theme::Beach => draw_beach,
        Theme::Forest => draw_forest,
    }
}

/// Top and bottom gradient colors for a layer.
///
/// The first layer fades from the sky color to a lighter sky, the last from
/// a darker floor to the floor color, and layers in between mix sky and floor
/// by depth.
#[must_use]
pub fn layer_gradient(profile: &SceneProfile, index: usize) -> (Color, Color) {
    let count = profile.layers.len();
    if index == 0 {
        (profile.sky_color, profile.sky_color.lighten(30))
    } else if index + 1 >= count {
        (profile.floor_color.darken(20), profile.floor_color)
    } else {
        let mid = profile
            .sky_color
            .blend(profile.floor_color, index as f32 / count as f32);
        (mid.lighten(10), mid.darken(10))
    }
}

/// Renders the placeholder for layer `index` of `profile`.
#[must_use]
pub fn synthesize(
    profile: &SceneProfile,
    index: usize,
    width: u32,
    height: u32,
    rng: &mut dyn RandomSource,
) -> Raster {
    let mut canvas = Canvas::new(width, height);
    let (top, bottom) = layer_gradient(profile, index);
    canvas.fill_screen(&Paint::vertical(height as f32, top, bottom));
    silhouette_for(profile.theme)(&mut canvas, index, rng);
    canvas.into_raster()
}

const SHADOW: Color = Color::BLACK;

fn draw_nothing(_: &mut dyn Surface, _: usize, _: &mut dyn RandomSource) {}

fn draw_mountains(surface: &mut dyn Surface, layer: usize, rng: &mut dyn RandomSource) {
    if layer == 0 {
        return;
    }
    let (w, h) = (surface.width(), surface.height());
    let peaks = 3 + layer * 2;
    let peak_width = w / peaks as f32;

    let mut path = Path::builder();
    path.move_to(Vec2::new(0.0, h));
    for i in 0..=peaks {
        let x = i as f32 * peak_width;
        let peak = rng.range(50.0, 150.0);
        if i == 0 {
            path.line_to(Vec2::new(x, h - peak / 2.0));
        } else {
            path.line_to(Vec2::new(x - peak_width / 3.0, h - peak / 3.0))
                .line_to(Vec2::new(x, h - peak))
                .line_to(Vec2::new(x + peak_width / 3.0, h - peak / 3.0));
        }
    }
    path.line_to(Vec2::new(w, h)).close();
    surface.fill_path(&path.build(), &Paint::Solid(SHADOW.with_alpha(0.2)));
}

fn draw_skyline(surface: &mut dyn Surface, layer: usize, rng: &mut dyn RandomSource) {
    if layer == 0 {
        return;
    }
    let (w, h) = (surface.width(), surface.height());
    let buildings = 10 + layer * 5;
    let building_width = w / buildings as f32;

    let mut path = Path::builder();
    path.move_to(Vec2::new(0.0, h));
    for i in 0..buildings {
        let x = i as f32 * building_width;
        let top = h - rng.range(30.0, 180.0);
        path.line_to(Vec2::new(x, top))
            .line_to(Vec2::new(x + building_width, top))
            .line_to(Vec2::new(x + building_width, h));
    }
    path.close();
    surface.fill_path(&path.build(), &Paint::Solid(SHADOW.with_alpha(0.3)));
}

fn draw_beach(surface: &mut dyn Surface, layer: usize, rng: &mut dyn RandomSource) {
    let (w, h) = (surface.width(), surface.height());
    match layer {
        1 => {
            let foam = Paint::Solid(Color::WHITE.with_alpha(0.2));
            for row in 0..5 {
                let y = h / 2.0 + row as f32 * 20.0;
                let mut path = Path::builder();
                path.move_to(Vec2::new(0.0, y));
                let mut x = 0.0;
                while x < w {
                    let crest = y - 5.0 - rng.range(0.0, 5.0);
                    path.quad_to(Vec2::new(x + 10.0, crest), Vec2::new(x + 20.0, y));
                    x += 20.0;
                }
                path.line_to(Vec2::new(w, h))
                    .line_to(Vec2::new(0.0, h))
                    .close();
                surface.fill_path(&path.build(), &foam);
            }
        },
        2 => {
            let shade = SHADOW.with_alpha(0.3);
            for i in 0..3 {
                let x = w * (0.2 + i as f32 * 0.3);
                let trunk = rng.range(100.0, 150.0);
                let crown = Vec2::new(x, h - trunk);
                let outline = Path::polygon(&[
                    Vec2::new(x - 5.0, h),
                    Vec2::new(x - 5.0, h - trunk),
                    Vec2::new(x + 5.0, h - trunk),
                    Vec2::new(x + 5.0, h),
                ]);
                surface.fill_path(&outline, &Paint::Solid(shade));

                let mut leaves = Path::builder();
                for j in 0..5 {
                    let angle = PI / 5.0 * j as f32;
                    let length = rng.range(30.0, 50.0);
                    let dir = Vec2::new(angle.cos(), -angle.sin());
                    leaves
                        .move_to(crown)
                        .quad_to(crown + dir * length * 0.6, crown + dir * length);
                }
                surface.stroke_path(&leaves.build(), shade, 1.0);
            }
        },
        _ => {},
    }
}

fn draw_forest(surface: &mut dyn Surface, layer: usize, rng: &mut dyn RandomSource) {
    if layer == 0 {
        return;
    }
    let (w, h) = (surface.width(), surface.height());
    let shade = Paint::Solid(SHADOW.with_alpha(0.4));
    let trees = 5 + layer * 3;
    let spacing = w / trees as f32;
    for i in 0..trees {
        let x = (i as f32 + 0.5) * spacing;
        let tree_height = rng.range(80.0, 200.0);
        surface.fill_rect(x - 5.0, h - tree_height, 10.0, tree_height, &shade);
        let radius = rng.range(30.0, 50.0);
        surface.fill_circle(Vec2::new(x, h - tree_height), radius, &shade);
    }
}
