//! Gradient geometry: canvas size, offset and direction from length + angle.
//!
//! A gradient of `length` pixels runs from the origin to
//! `R = (length - 1) · (cos θ, sin θ)`, so the last sample lands exactly on
//! the end color. The canvas is the gradient's axis-aligned footprint.
//! In extend mode each side is stretched to `length / cos θ` (resp. `sin θ`)
//! so the gradient fills the whole box along its own axis.

use crate::config::EngineConfig;
use crate::coords::{Canvas, Vec2};
use crate::paint::GradientSpec;

/// Below this, `cos θ` / `sin θ` is treated as zero in extend mode.
const AXIS_EPSILON: f64 = 1e-4;

/// Float noise tolerated before an extent rounds up to the next pixel.
const PIXEL_EPSILON: f64 = 1e-6;

/// Resolved drawing geometry for one gradient.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Geometry {
    pub canvas: Canvas,
    /// End-point vector `R`; the gradient runs from the origin to here.
    pub direction: Vec2,
    /// `|R|`, i.e. `length - 1`.
    pub reach: f64,
}

impl Geometry {
    /// Projection fraction of a gradient-space point onto `R`.
    ///
    /// `0` at the origin, `1` at `R`. A zero-length gradient maps every point
    /// to `0`.
    #[inline]
    pub fn fraction(&self, p: Vec2) -> f64 {
        let r2 = self.reach * self.reach;
        if r2 == 0.0 { 0.0 } else { p.dot(self.direction) / r2 }
    }
}

/// Turns gradient length and angle into a [`Geometry`].
#[derive(Debug, Copy, Clone)]
pub struct GeometryResolver {
    min_width: u32,
}

impl GeometryResolver {
    pub fn new(config: &EngineConfig) -> Self {
        Self { min_width: config.min_width.max(1) }
    }

    #[inline]
    pub fn resolve_spec(&self, spec: &GradientSpec) -> Geometry {
        self.resolve(spec.length, spec.angle, spec.extend)
    }

    pub fn resolve(&self, length: u32, angle_degrees: u32, extend: bool) -> Geometry {
        let len = length as f64;
        let reach = length.saturating_sub(1) as f64;

        let unit = Vec2::from_angle((angle_degrees as f64).to_radians());
        let direction = unit * reach;

        let w0 = extent(len, unit.x, extend);
        let h0 = extent(len, unit.y, extend);

        let canvas = Canvas::new(
            self.pixels(w0),
            self.pixels(h0),
            Vec2::new(w0.min(0.0), h0.min(0.0)),
        );

        log::trace!("resolved {length}px @ {angle_degrees}° extend={extend} -> {canvas:?}");

        Geometry { canvas, direction, reach }
    }

    fn pixels(&self, extent: f64) -> u32 {
        let px = (extent.abs() - PIXEL_EPSILON).ceil().max(0.0);
        // Bounded by length / AXIS_EPSILON; the cast saturates regardless.
        (px as u32).max(self.min_width)
    }
}

/// Unconstrained canvas extent along one axis, signed.
#[inline]
fn extent(len: f64, component: f64, extend: bool) -> f64 {
    if extend && component.abs() > AXIS_EPSILON {
        len / component
    } else {
        len * component
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> GeometryResolver {
        GeometryResolver::new(&EngineConfig::default())
    }

    // ── axis-aligned ──────────────────────────────────────────────────────

    #[test]
    fn horizontal_is_length_by_min_width() {
        let g = resolver().resolve(10, 0, false);
        assert_eq!(g.canvas.width, 10);
        assert_eq!(g.canvas.height, EngineConfig::default().min_width);
        assert_eq!(g.canvas.offset, Vec2::zero());
        assert_eq!(g.direction, Vec2::new(9.0, 0.0));
        assert_eq!(g.reach, 9.0);
    }

    #[test]
    fn vertical_is_min_width_by_length() {
        let g = resolver().resolve(10, 90, false);
        assert_eq!(g.canvas.width, 1);
        assert_eq!(g.canvas.height, 10);
        assert_eq!(g.canvas.offset.y, 0.0);
    }

    #[test]
    fn reversed_direction_becomes_negative_offset() {
        let g = resolver().resolve(10, 180, false);
        assert_eq!(g.canvas.width, 10);
        assert_eq!(g.canvas.offset.x, -10.0);
        assert!(g.canvas.offset.y.abs() < 1e-9);

        let g = resolver().resolve(10, 270, false);
        assert_eq!(g.canvas.height, 10);
        assert_eq!(g.canvas.offset.y, -10.0);
    }

    #[test]
    fn extend_on_axis_matches_plain() {
        let r = resolver();
        assert_eq!(r.resolve(10, 0, true).canvas, r.resolve(10, 0, false).canvas);
    }

    // ── diagonals ─────────────────────────────────────────────────────────

    #[test]
    fn diagonal_footprint() {
        let g = resolver().resolve(100, 45, false);
        // 100 · cos 45° ≈ 70.7
        assert_eq!(g.canvas.width, 71);
        assert_eq!(g.canvas.height, 71);
    }

    #[test]
    fn extend_grows_canvas() {
        let r = resolver();
        let plain = r.resolve(4, 45, false).canvas;
        let extended = r.resolve(4, 45, true).canvas;

        assert!(extended.width > plain.width);
        assert!(extended.height > plain.height);
        // 4 / cos 45° ≈ 5.66
        assert_eq!(extended.width, 6);
        assert!(plain.width >= 1 && plain.height >= 1);
    }

    #[test]
    fn min_width_is_respected() {
        let r = GeometryResolver::new(&EngineConfig::default().with_min_width(8));
        let g = r.resolve(10, 0, false);
        assert_eq!(g.canvas.width, 10);
        assert_eq!(g.canvas.height, 8);
    }

    // ── fraction ──────────────────────────────────────────────────────────

    #[test]
    fn fraction_spans_zero_to_one() {
        let g = resolver().resolve(10, 0, false);
        assert_eq!(g.fraction(Vec2::new(0.0, 0.0)), 0.0);
        assert_eq!(g.fraction(Vec2::new(9.0, 0.0)), 1.0);
        assert_eq!(g.fraction(Vec2::new(4.5, 3.0)), 0.5);
    }

    #[test]
    fn zero_reach_fraction_is_zero() {
        let g = resolver().resolve(1, 30, false);
        assert_eq!(g.reach, 0.0);
        assert_eq!(g.fraction(Vec2::new(5.0, 5.0)), 0.0);
    }
}
