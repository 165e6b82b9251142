/// Straight-alpha RGBA color with `f32` channels in `[0, 255]`.
///
/// Working precision for bilinear filtering; quantized back to bytes exactly once
/// per output pixel.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ColorRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorRgba {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque black, the color of every out-of-bounds sample.
    #[inline]
    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0, 255.0)
    }

    #[inline]
    pub fn from_rgba8(px: [u8; 4]) -> Self {
        Self::new(px[0] as f32, px[1] as f32, px[2] as f32, px[3] as f32)
    }

    /// Rounds and saturates each channel to a byte.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f32| v.round().clamp(0.0, 255.0) as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    #[inline]
    pub fn lerp(self, other: ColorRgba, t: f32) -> ColorRgba {
        ColorRgba::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Multiplies the color channels, leaving alpha untouched.
    #[inline]
    pub fn scale_rgb(self, m: f32) -> ColorRgba {
        ColorRgba::new(self.r * m, self.g * m, self.b * m, self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba8_round_trip_is_exact() {
        let px = [12, 200, 255, 7];
        assert_eq!(ColorRgba::from_rgba8(px).to_rgba8(), px);
    }

    #[test]
    fn scale_rgb_keeps_alpha() {
        let c = ColorRgba::new(100.0, 50.0, 20.0, 200.0).scale_rgb(0.5);
        assert_eq!(c.to_rgba8(), [50, 25, 10, 200]);
    }

    #[test]
    fn to_rgba8_saturates() {
        assert_eq!(ColorRgba::new(-4.0, 300.0, 0.4, 254.6).to_rgba8(), [0, 255, 0, 255]);
    }
}
