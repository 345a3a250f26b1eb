//! Coordinate types shared by the geometry resolver and the rasterizer.
//!
//! Canonical raster space:
//! - Pixels
//! - Origin top-left of the canvas
//! - +X right, +Y down
//!
//! Gradient math runs in `f64`; integer pixel positions are converted at the
//! loop boundary only.

mod canvas;
mod vec2;

pub use canvas::Canvas;
pub use vec2::Vec2;
