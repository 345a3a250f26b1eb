use crate::paint::color::CHANNEL_MAX;

/// Per-channel float → byte quantizer.
///
/// With diffusion on, one running error accumulator per `[a, r, g, b]`
/// channel spans the whole pass. The accumulator is a single 1-D sum, so the
/// order samples are fed in determines the output; the rasterizer feeds them
/// column-major.
///
/// Per sample:
/// ```text
/// rounded    = round(v)
/// error     += v - rounded
/// correction = trunc(error)      // toward zero: 1.9 → 1, -0.9 → 0
/// error     -= correction
/// stored     = clamp(rounded + correction)
/// ```
/// After every step `|error| < 1`, which bounds the summed quantization
/// error of a channel.
#[derive(Debug, Clone)]
pub struct Quantizer {
    diffuse: bool,
    error: [f64; 4],
}

impl Quantizer {
    pub fn new(diffuse: bool) -> Self {
        Self { diffuse, error: [0.0; 4] }
    }

    /// Quantizes one channel value (`0 = a, 1 = r, 2 = g, 3 = b`).
    #[inline]
    pub fn quantize(&mut self, channel: usize, value: f64) -> u8 {
        let rounded = value.round();
        let out = if self.diffuse {
            let err = &mut self.error[channel];
            *err += value - rounded;
            let correction = err.trunc();
            *err -= correction;
            rounded + correction
        } else {
            rounded
        };
        out.clamp(0.0, CHANNEL_MAX[channel] as f64) as u8
    }

    /// Quantizes all four channels.
    #[inline]
    pub fn quantize_all(&mut self, values: [f64; 4]) -> [u8; 4] {
        [
            self.quantize(0, values[0]),
            self.quantize(1, values[1]),
            self.quantize(2, values[2]),
            self.quantize(3, values[3]),
        ]
    }

    /// Outstanding error per channel.
    #[inline]
    pub fn residual(&self) -> [f64; 4] {
        self.error
    }
}
