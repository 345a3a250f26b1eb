use crate::config::EngineConfig;
use crate::geometry::Geometry;
use crate::paint::{Color, GradientSpec};

use super::{Pixmap, Quantizer};

/// Linear blend of one channel at projection fraction `m`.
///
/// Outside `(0, 1)` the exact endpoint value is returned, so the first and
/// last samples never pick up float noise.
#[inline]
pub fn blend_channel(start: u8, end: u8, m: f64) -> f64 {
    if m <= 0.0 {
        start as f64
    } else if m >= 1.0 {
        end as f64
    } else {
        start as f64 * (1.0 - m) + end as f64 * m
    }
}

/// Renders two-color linear gradients into a [`Pixmap`].
///
/// Rendering is a pure function of geometry and colors. It runs serially:
/// with error diffusion on, output depends on the exact column-major visiting
/// order.
#[derive(Debug, Copy, Clone)]
pub struct GradientRasterizer {
    error_diffusion: bool,
}

impl GradientRasterizer {
    pub fn new(config: &EngineConfig) -> Self {
        Self { error_diffusion: config.error_diffusion }
    }

    pub fn render(&self, geometry: &Geometry, spec: &GradientSpec) -> Pixmap {
        let canvas = geometry.canvas;
        let mut pixmap = Pixmap::new(canvas.width, canvas.height, spec.start);
        let mut quantizer = Quantizer::new(self.error_diffusion);

        let start = spec.start.channels();
        let end = spec.end.channels();

        // Column-major: the accumulator is one running sum over this order.
        for col in 0..canvas.width {
            for row in 0..canvas.height {
                let m = geometry.fraction(canvas.position(col, row));
                let blended = [
                    blend_channel(start[0], end[0], m),
                    blend_channel(start[1], end[1], m),
                    blend_channel(start[2], end[2], m),
                    blend_channel(start[3], end[3], m),
                ];
                pixmap.set(col, row, Color::from_channels(quantizer.quantize_all(blended)));
            }
        }

        log::debug!(
            "rasterized {}x{} gradient {} -> {} (diffusion={})",
            canvas.width,
            canvas.height,
            spec.start.to_hex(),
            spec.end.to_hex(),
            self.error_diffusion,
        );

        pixmap
    }
}
