//! Lens definitions and the ordered, capacity-bounded lens field.

mod field;

pub use field::LensField;

use crate::coords::Vec2;

/// A single distortion emitter.
///
/// `center` is in normalized edit space (top-left origin). `sigma` is the
/// normalized spread; `strength` is the pull factor `k` in `[0, 4]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Lens {
    pub center: Vec2,
    pub sigma: f32,
    pub strength: f32,
}

impl Lens {
    #[inline]
    pub const fn new(center: Vec2, sigma: f32, strength: f32) -> Self {
        Self { center, sigma, strength }
    }
}
