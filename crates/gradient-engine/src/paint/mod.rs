//! Paint model: colors and the gradient request they form.
//!
//! Scope:
//! - 7-bit alpha ARGB color and its permissive hex codec
//! - two-stop linear gradient spec with normalized length and angle

pub mod color;
pub mod gradient;

pub use color::{parse_color, Color};
pub use gradient::GradientSpec;
