/// Reads a leading decimal integer, ignoring anything after it.
///
/// `"42px"` reads as `42`, `"-7"` as `-7`, `"abc"` and `""` as `0`.
/// Values beyond `i64` saturate.
pub fn parse_int_lenient(input: &str) -> i64 {
    let s = input.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let magnitude = rest
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, b| acc.saturating_mul(10).saturating_add((b - b'0') as i64));

    if negative { -magnitude } else { magnitude }
}

/// Boolean-ish coercion: empty, `0`, `false`, `no` and `off` are false
/// (case-insensitive), anything else is true.
pub fn parse_bool_lenient(input: &str) -> bool {
    !matches!(
        input.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}
