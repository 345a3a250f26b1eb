use crate::config::EngineConfig;

use super::Color;

/// Angles closer than this to an axis fold onto it in extend mode.
pub const AXIS_SNAP_DEGREES: u32 = 15;

/// Normalized two-color linear gradient request.
///
/// Invariants (established by [`GradientSpec::new`]):
/// - `length` is within the configured `[min_length, max_length]`
/// - `angle` is in `[0, 360)`; with `extend` set it is additionally folded
///   onto the nearest of `0`, `90`, `180`, `270` when within
///   [`AXIS_SNAP_DEGREES`] of it, keeping the gradient's direction
///
/// Angles are measured from +X toward +Y (clockwise on screen).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GradientSpec {
    pub start: Color,
    pub end: Color,
    pub length: u32,
    pub angle: u32,
    pub extend: bool,
}

impl GradientSpec {
    /// Builds a spec, clamping `length` and normalizing `angle`.
    ///
    /// `angle` is clamped to `[0, 360]` and then wrapped, so `360` reads as
    /// `0` and negative input reads as `0`.
    pub fn new(start: Color, end: Color, length: i64, angle: i64, extend: bool, config: &EngineConfig) -> Self {
        let length = length.clamp(config.min_length as i64, config.max_length as i64) as u32;
        let angle = (angle.clamp(0, 360) % 360) as u32;
        let angle = if extend { fold_to_axis(angle) } else { angle };

        Self { start, end, length, angle, extend }
    }

    /// Distance in pixels from the first to the last gradient sample.
    #[inline]
    pub fn reach(&self) -> u32 {
        self.length.saturating_sub(1)
    }
}

/// Folds angles near an axis onto that axis direction (`0`, `90`, `180` or
/// `270`), so the gradient keeps pointing the same way.
///
/// Extend mode divides by `cos θ` / `sin θ`; near an axis that explodes the
/// canvas on the perpendicular side.
fn fold_to_axis(angle: u32) -> u32 {
    let nearest = (angle + 45) / 90 * 90;
    if angle.abs_diff(nearest) < AXIS_SNAP_DEGREES {
        nearest % 360
    } else {
        angle
    }
}
