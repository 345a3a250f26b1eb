use std::fmt;

use crate::paint::GradientSpec;

/// Canonical cache key: `{start}-{end}-{length}-{angle}-{extend}`.
///
/// Colors are the 8-digit lowercase hex of the packed ARGB value, `extend`
/// is `1` or `0`. Keys only contain `[0-9a-f-]`, so they are safe file
/// names.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn for_spec(spec: &GradientSpec) -> Self {
        Self(format!(
            "{}-{}-{}-{}-{}",
            spec.start.to_hex(),
            spec.end.to_hex(),
            spec.length,
            spec.angle,
            u8::from(spec.extend),
        ))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::paint::parse_color;

    #[test]
    fn key_format() {
        let spec = GradientSpec::new(parse_color("f00"), parse_color("0000ff"), 10, 45, true, &EngineConfig::default());
        assert_eq!(CacheKey::for_spec(&spec).as_str(), "00ff0000-000000ff-10-45-1");
    }

    #[test]
    fn equivalent_inputs_share_a_key() {
        let c = EngineConfig::default();
        let a = GradientSpec::new(parse_color("abc"), parse_color("000"), 2, 360, false, &c);
        let b = GradientSpec::new(parse_color("AABBCC"), parse_color("000000"), c.min_length as i64, 0, false, &c);
        assert_eq!(CacheKey::for_spec(&a), CacheKey::for_spec(&b));
    }
}
