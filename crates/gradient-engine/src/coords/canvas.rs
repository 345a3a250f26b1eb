use super::Vec2;

/// Raster canvas a gradient is drawn onto.
///
/// `offset` shifts canvas-local pixel positions into gradient space:
/// pixel `(col, row)` sits at `(col + offset.x, row + offset.y)`. Offsets are
/// zero or negative, so gradients pointing up or left still land on
/// non-negative canvas coordinates.
///
/// Derived from a `GradientSpec`; never persisted.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub offset: Vec2,
}

impl Canvas {
    #[inline]
    pub const fn new(width: u32, height: u32, offset: Vec2) -> Self {
        Self { width, height, offset }
    }

    #[inline]
    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Gradient-space position of the pixel at `(col, row)`.
    #[inline]
    pub fn position(self, col: u32, row: u32) -> Vec2 {
        Vec2::new(col as f64 + self.offset.x, row as f64 + self.offset.y)
    }
}
