//! CPU rasterization of linear gradients.
//!
//! Pipeline per pixel: projection fraction along the gradient direction,
//! per-channel linear blend in `f64`, then quantization through a
//! [`Quantizer`] that optionally carries rounding error forward.

mod diffusion;
mod pixmap;
mod raster;

pub use diffusion::Quantizer;
pub use pixmap::Pixmap;
pub use raster::{blend_channel, GradientRasterizer};
