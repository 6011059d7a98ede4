//! # Arena Kernel
//!
//! Drawing and asset plumbing for the Arena backdrop.
//!
//! This crate provides:
//! - The [`Surface`] trait: a fixed-size 2D raster target with alpha-blended
//!   image blits, rectangles, paths, gradients and a global alpha
//! - [`Canvas`]: a CPU implementation of [`Surface`] backed by an RGBA image
//! - [`RecordingSurface`]: a [`Surface`] that records draw calls instead of
//!   rasterising them
//! - [`Raster`]: a shared, immutable RGBA image handle
//! - [`ImageLoader`]: asynchronous image fetching, with a filesystem
//!   implementation
//!
//! ## Coordinates
//!
//! Surfaces use canvas conventions: origin at the top-left, x to the right,
//! y downwards, units in pixels. Pixel `(x, y)` is covered by a shape when
//! its centre `(x + 0.5, y + 0.5)` lies inside the shape.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod canvas;
pub mod image_loader;
pub mod path;
pub mod raster;
pub mod recording;
pub mod surface;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::canvas::*;
    pub use crate::image_loader::*;
    pub use crate::path::*;
    pub use crate::raster::*;
    pub use crate::recording::*;
    pub use crate::surface::*;
}

pub use prelude::*;
