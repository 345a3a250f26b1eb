//! Raw request parameters and their fail-open normalization.
//!
//! Whatever the protocol layer hands over (query-string values, CLI
//! arguments) arrives here as optional strings. Normalization never rejects
//! anything: missing or malformed values degrade to `0` and are then clamped,
//! so every request maps to some renderable [`GradientSpec`].

mod lenient;

pub use lenient::{parse_bool_lenient, parse_int_lenient};

use crate::config::EngineConfig;
use crate::paint::{parse_color, GradientSpec};

/// Unvalidated gradient parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GradientParams {
    pub start: Option<String>,
    pub end: Option<String>,
    pub length: Option<String>,
    /// Degrees, or `"h"` (0) / `"v"` (90).
    pub angle: Option<String>,
    pub extend: Option<String>,
}

impl GradientParams {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self { start: Some(start.into()), end: Some(end.into()), ..Self::default() }
    }

    pub fn length(mut self, length: impl Into<String>) -> Self {
        self.length = Some(length.into());
        self
    }

    pub fn angle(mut self, angle: impl Into<String>) -> Self {
        self.angle = Some(angle.into());
        self
    }

    pub fn extend(mut self, extend: impl Into<String>) -> Self {
        self.extend = Some(extend.into());
        self
    }

    /// Normalizes into a spec. Never fails.
    pub fn normalize(&self, config: &EngineConfig) -> GradientSpec {
        let field = |v: &Option<String>| v.as_deref().unwrap_or("").trim().to_owned();

        let start = parse_color(&field(&self.start));
        let end = parse_color(&field(&self.end));
        let length = parse_int_lenient(&field(&self.length));
        let angle = match field(&self.angle).to_ascii_lowercase().as_str() {
            "h" => 0,
            "v" => 90,
            other => parse_int_lenient(other),
        };
        let extend = parse_bool_lenient(&field(&self.extend));

        GradientSpec::new(start, end, length, angle, extend, config)
    }
}
