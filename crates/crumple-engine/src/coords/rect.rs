use super::Vec2;

/// Axis-aligned rectangle (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Rectangle anchored at the origin.
    #[inline]
    pub const fn from_size(w: f32, h: f32) -> Self {
        Self::new(0.0, 0.0, w, h)
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x, self.origin.y + self.size.y)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.origin.x && p.y >= self.origin.y && p.x < max.x && p.y < max.y
    }

    /// Maps a normalized position (`0..1` on each axis, top-left origin) into the rectangle.
    #[inline]
    pub fn point_at(self, t: Vec2) -> Vec2 {
        Vec2::new(self.origin.x + t.x * self.size.x, self.origin.y + t.y * self.size.y)
    }

    /// Inverse of [`point_at`](Self::point_at). Empty axes map to `0`.
    #[inline]
    pub fn normalize_point(self, p: Vec2) -> Vec2 {
        let axis = |v: f32, o: f32, s: f32| if s > 0.0 { (v - o) / s } else { 0.0 };
        Vec2::new(
            axis(p.x, self.origin.x, self.size.x),
            axis(p.y, self.origin.y, self.size.y),
        )
    }
}
