//! Engine configuration.
//!
//! One [`EngineConfig`] is built per process (or per request handler) and
//! passed explicitly into the cache, the geometry resolver and the service.
//! Nothing here is global state.

use std::path::PathBuf;

/// Default cache size budget: 64 MiB.
pub const CACHE_SIZE_BUDGET_BYTES: u64 = 64 * 1024 * 1024;
/// Smallest width/height a rendered canvas may have.
pub const MIN_WIDTH: u32 = 1;
/// Shortest accepted gradient length in pixels.
pub const MIN_LENGTH: u32 = 4;
/// Longest accepted gradient length in pixels.
pub const MAX_LENGTH: u32 = 9999;
/// Whether rasterization carries rounding error forward.
pub const ERROR_DIFFUSION_ENABLED: bool = true;

const ENV_CACHE_DIR: &str = "GRADIENT_CACHE_DIR";
const ENV_CACHE_BUDGET: &str = "GRADIENT_CACHE_BUDGET";
const ENV_ERROR_DIFFUSION: &str = "GRADIENT_ERROR_DIFFUSION";

/// Runtime configuration for the gradient engine.
///
/// Keep this structure small. Every field maps to one knob a deployment
/// actually turns.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Directory holding rendered images. Created on open if missing.
    pub cache_dir: PathBuf,

    /// Upper bound on the summed size of cached images, in bytes.
    pub cache_budget_bytes: u64,

    /// Minimum canvas extent on either axis.
    pub min_width: u32,

    /// Gradient length clamp, inclusive.
    pub min_length: u32,
    pub max_length: u32,

    /// Error-diffusion rounding in the rasterizer. When off, every channel is
    /// rounded independently.
    pub error_diffusion: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_dir: std::env::temp_dir().join("gradient-cache"),
            cache_budget_bytes: CACHE_SIZE_BUDGET_BYTES,
            min_width: MIN_WIDTH,
            min_length: MIN_LENGTH,
            max_length: MAX_LENGTH,
            error_diffusion: ERROR_DIFFUSION_ENABLED,
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with `GRADIENT_CACHE_DIR`, `GRADIENT_CACHE_BUDGET`
    /// and `GRADIENT_ERROR_DIFFUSION`.
    ///
    /// Unparsable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::default().overlay(|name| std::env::var(name).ok())
    }

    fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(ENV_CACHE_DIR).filter(|d| !d.trim().is_empty()) {
            self.cache_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup(ENV_CACHE_BUDGET) {
            match raw.trim().parse::<u64>() {
                Ok(budget) => self.cache_budget_bytes = budget,
                Err(err) => log::warn!("ignoring {ENV_CACHE_BUDGET}={raw:?}: {err}"),
            }
        }

        if let Some(raw) = lookup(ENV_ERROR_DIFFUSION) {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "on" | "yes" => self.error_diffusion = true,
                "0" | "false" | "off" | "no" => self.error_diffusion = false,
                _ => log::warn!("ignoring {ENV_ERROR_DIFFUSION}={raw:?}: expected a boolean"),
            }
        }

        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    pub fn with_cache_budget(mut self, bytes: u64) -> Self {
        self.cache_budget_bytes = bytes;
        self
    }

    pub fn with_error_diffusion(mut self, enabled: bool) -> Self {
        self.error_diffusion = enabled;
        self
    }

    pub fn with_length_bounds(mut self, min: u32, max: u32) -> Self {
        debug_assert!(min <= max);
        self.min_length = min;
        self.max_length = max;
        self
    }

    pub fn with_min_width(mut self, min_width: u32) -> Self {
        self.min_width = min_width;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overlay(vars: &[(&str, &str)]) -> EngineConfig {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        EngineConfig::default().overlay(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_match_constants() {
        let c = EngineConfig::default();
        assert_eq!(c.cache_budget_bytes, CACHE_SIZE_BUDGET_BYTES);
        assert_eq!(c.min_width, MIN_WIDTH);
        assert_eq!(c.min_length, MIN_LENGTH);
        assert_eq!(c.max_length, MAX_LENGTH);
        assert_eq!(c.error_diffusion, ERROR_DIFFUSION_ENABLED);
    }

    #[test]
    fn env_overrides_are_applied() {
        let c = overlay(&[
            (ENV_CACHE_DIR, "/srv/gradients"),
            (ENV_CACHE_BUDGET, "1024"),
            (ENV_ERROR_DIFFUSION, "off"),
        ]);
        assert_eq!(c.cache_dir, PathBuf::from("/srv/gradients"));
        assert_eq!(c.cache_budget_bytes, 1024);
        assert!(!c.error_diffusion);
    }

    #[test]
    fn bad_env_values_fall_back_to_defaults() {
        let c = overlay(&[
            (ENV_CACHE_DIR, "   "),
            (ENV_CACHE_BUDGET, "lots"),
            (ENV_ERROR_DIFFUSION, "maybe"),
        ]);
        assert_eq!(c, EngineConfig::default());
    }
}
