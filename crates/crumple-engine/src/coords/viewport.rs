use super::Vec2;

/// Surface size in logical (device-independent) pixels plus the device pixel ratio.
///
/// Pixel-valued configuration (pick radius, sigma bounds) is normalized against
/// [`min_side`](Self::min_side) so lens geometry stays resolution-independent.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scale_factor: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height, scale_factor: 1.0 }
    }

    #[inline]
    pub const fn with_scale_factor(width: f32, height: f32, scale_factor: f32) -> Self {
        Self { width, height, scale_factor }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && self.width.is_finite()
            && self.height.is_finite()
            && self.scale_factor > 0.0
            && self.scale_factor.is_finite()
    }

    #[inline]
    pub fn logical_size(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Framebuffer size in physical pixels, never smaller than 2×2.
    pub fn physical_size(self) -> (u32, u32) {
        let w = (self.width * self.scale_factor).floor().max(2.0);
        let h = (self.height * self.scale_factor).floor().max(2.0);
        (w as u32, h as u32)
    }

    /// Shorter logical side, floored at one pixel.
    #[inline]
    pub fn min_side(self) -> f32 {
        self.width.min(self.height).max(1.0)
    }

    /// Converts a length in logical pixels into normalized units.
    #[inline]
    pub fn normalize_len(self, px: f32) -> f32 {
        px / self.min_side()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}
