/// Packed ARGB color with a 7-bit alpha channel.
///
/// Invariant:
/// - `a` is in `0..=127`; `r`, `g`, `b` use the full byte.
///
/// Alpha semantics follow the 7-bit convention: `0` is fully opaque and
/// `127` fully transparent. A plain `rrggbb` color is therefore opaque.
/// Conversion to 8-bit straight alpha happens only when encoding
/// ([`Color::to_rgba8`]).
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Largest value a packed color may hold; the top bit is never set.
pub const MAX_ARGB: u32 = 0x7fff_ffff;

/// Largest 7-bit alpha value (fully transparent).
pub const ALPHA_MAX: u8 = 127;

/// Channel upper bounds in `[a, r, g, b]` order.
pub const CHANNEL_MAX: [u8; 4] = [ALPHA_MAX, 255, 255, 255];

impl Color {
    #[inline]
    pub const fn transparent() -> Self {
        Self { a: ALPHA_MAX, r: 0, g: 0, b: 0 }
    }

    /// Opaque color from RGB bytes.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { a: 0, r, g, b }
    }

    /// Decomposes a packed value. Values above [`MAX_ARGB`] are clamped first.
    #[inline]
    pub const fn from_argb(value: u32) -> Self {
        let v = if value > MAX_ARGB { MAX_ARGB } else { value };
        Self {
            a: ((v >> 24) & 0x7f) as u8,
            r: ((v >> 16) & 0xff) as u8,
            g: ((v >> 8) & 0xff) as u8,
            b: (v & 0xff) as u8,
        }
    }

    #[inline]
    pub const fn to_argb(self) -> u32 {
        ((self.a as u32 & 0x7f) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Eight lowercase hex digits of the packed value, as used in cache keys.
    pub fn to_hex(self) -> String {
        format!("{:08x}", self.to_argb())
    }

    /// Channels in `[a, r, g, b]` order.
    #[inline]
    pub const fn channels(self) -> [u8; 4] {
        [self.a, self.r, self.g, self.b]
    }

    /// Inverse of [`channels`](Self::channels). Alpha is masked to 7 bits.
    #[inline]
    pub const fn from_channels(c: [u8; 4]) -> Self {
        Self { a: c[0] & 0x7f, r: c[1], g: c[2], b: c[3] }
    }

    /// Straight-alpha RGBA bytes for image encoders.
    ///
    /// Maps 7-bit transparency onto 8-bit opacity with `255 - (2a + a/64)`,
    /// so `0 → 255` and `127 → 0` exactly.
    #[inline]
    pub const fn to_rgba8(self) -> [u8; 4] {
        let a = self.a & 0x7f;
        let opacity = 255 - ((a << 1) + (a >> 6));
        [self.r, self.g, self.b, opacity]
    }
}

/// Parses a hex color string. Never fails.
///
/// Accepted shapes, after stripping one optional leading `#`:
/// - 3 digits: each digit is doubled (`"f0a"` reads as `"ff00aa"`)
/// - 6 or 8 digits, and in fact any other length: read as one hex number
///
/// Parsing is deliberately permissive. Characters that are not hex digits
/// are skipped, an empty or all-invalid string reads as `0`, and the value
/// saturates and is then clamped to [`MAX_ARGB`]. An 8-digit string with the
/// top bit set therefore collapses to `0x7fffffff`.
pub fn parse_color(input: &str) -> Color {
    let digits = input.strip_prefix('#').unwrap_or(input);

    let value = if digits.len() == 3 {
        digits.chars().fold(0u64, |acc, ch| {
            let d = hex_digit(ch).unwrap_or(0);
            acc.saturating_mul(256).saturating_add(d * 17)
        })
    } else {
        digits
            .chars()
            .filter_map(hex_digit)
            .fold(0u64, |acc, d| acc.saturating_mul(16).saturating_add(d))
    };

    Color::from_argb(value.min(MAX_ARGB as u64) as u32)
}

#[inline]
fn hex_digit(ch: char) -> Option<u64> {
    ch.to_digit(16).map(u64::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── parse_color ───────────────────────────────────────────────────────

    #[test]
    fn short_form_expands() {
        assert_eq!(parse_color("f00"), parse_color("ff0000"));
        assert_eq!(parse_color("abc"), parse_color("aabbcc"));
    }

    #[test]
    fn six_digits_are_opaque_rgb() {
        assert_eq!(parse_color("ff8000"), Color::rgb(0xff, 0x80, 0x00));
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(parse_color("AbCdEf"), parse_color("abcdef"));
    }

    #[test]
    fn eight_digits_carry_alpha() {
        let c = parse_color("40112233");
        assert_eq!(c, Color { a: 0x40, r: 0x11, g: 0x22, b: 0x33 });
    }

    #[test]
    fn top_bit_clamps_to_max() {
        // 0x80000000 and above collapse to 0x7fffffff.
        let c = parse_color("ffffffff");
        assert_eq!(c.to_argb(), MAX_ARGB);
        assert_eq!(c, Color { a: 127, r: 255, g: 255, b: 255 });
        assert_eq!(parse_color("80000000"), c);
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(parse_color(""), Color::default());
        assert_eq!(parse_color("#"), Color::default());
    }

    #[test]
    fn invalid_characters_are_skipped() {
        assert_eq!(parse_color("zzzzzz"), Color::default());
        assert_eq!(parse_color("ff-00-00"), parse_color("ff0000"));
    }

    #[test]
    fn invalid_short_form_digit_reads_as_zero() {
        assert_eq!(parse_color("fz0"), parse_color("ff0000"));
    }

    #[test]
    fn hash_prefix_is_optional() {
        assert_eq!(parse_color("#f00"), parse_color("f00"));
        assert_eq!(parse_color("#0000ff"), Color::rgb(0, 0, 255));
    }

    #[test]
    fn odd_lengths_read_as_raw_number() {
        assert_eq!(parse_color("1").to_argb(), 1);
        assert_eq!(parse_color("12345").to_argb(), 0x12345);
    }

    #[test]
    fn huge_input_saturates() {
        let long = "f".repeat(200);
        assert_eq!(parse_color(&long).to_argb(), MAX_ARGB);
    }

    #[test]
    fn non_ascii_does_not_panic() {
        assert_eq!(parse_color("ü€"), Color::default());
        assert_eq!(parse_color("é0f").to_argb(), 0x0f);
    }

    // ── conversions ───────────────────────────────────────────────────────

    #[test]
    fn hex_is_eight_lowercase_digits() {
        assert_eq!(parse_color("F00").to_hex(), "00ff0000");
        assert_eq!(Color::default().to_hex(), "00000000");
    }

    #[test]
    fn channels_round_trip_masks_alpha() {
        let c = Color::from_channels([0xff, 1, 2, 3]);
        assert_eq!(c.a, 0x7f);
        assert_eq!(c.channels(), [0x7f, 1, 2, 3]);
    }

    #[test]
    fn rgba8_alpha_endpoints() {
        assert_eq!(Color::rgb(1, 2, 3).to_rgba8(), [1, 2, 3, 255]);
        assert_eq!(Color::transparent().to_rgba8()[3], 0);
        assert_eq!(Color { a: 64, ..Color::default() }.to_rgba8()[3], 126);
    }
}
