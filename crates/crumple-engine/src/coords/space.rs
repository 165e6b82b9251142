//! Conversions between the three coordinate spaces.
//!
//! - **logical**: surface pixels, top-left origin, +Y down.
//! - **edit**: unit square, top-left origin. Lens centers are stored here.
//! - **shader**: unit square, bottom-left origin. The warp formula runs here.
//!
//! Every y-flip in the crate goes through this module.

use super::{Vec2, Viewport};

/// Logical surface pixels to normalized edit space.
#[inline]
pub fn logical_to_edit(p: Vec2, viewport: Viewport) -> Vec2 {
    Vec2::new(p.x / viewport.width, p.y / viewport.height)
}

/// Normalized edit space to logical surface pixels.
#[inline]
pub fn edit_to_logical(p: Vec2, viewport: Viewport) -> Vec2 {
    Vec2::new(p.x * viewport.width, p.y * viewport.height)
}

/// Edit space (top-left origin) to shader space (bottom-left origin).
#[inline]
pub fn edit_to_shader(p: Vec2) -> Vec2 {
    Vec2::new(p.x, 1.0 - p.y)
}

/// Shader space back to edit space. Same `1 - y` flip; round trips are
/// exact up to f32 rounding.
#[inline]
pub fn shader_to_edit(p: Vec2) -> Vec2 {
    edit_to_shader(p)
}

/// Shader-space coordinate of the center of output pixel `(x, y)` in a
/// `width × height` framebuffer whose row 0 is the top row.
#[inline]
pub fn pixel_center_to_shader(x: u32, y: u32, width: u32, height: u32) -> Vec2 {
    let edit = Vec2::new(
        (x as f32 + 0.5) / width as f32,
        (y as f32 + 0.5) / height as f32,
    );
    edit_to_shader(edit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_is_involution() {
        let p = Vec2::new(0.25, 0.1);
        let back = shader_to_edit(edit_to_shader(p));
        assert!((back - p).length() < 1e-6, "{back:?}");
        // Dyadic values flip exactly.
        let q = Vec2::new(0.5, 0.25);
        assert_eq!(edit_to_shader(q), Vec2::new(0.5, 0.75));
        assert_eq!(shader_to_edit(edit_to_shader(q)), q);
    }

    #[test]
    fn logical_edit_round_trip() {
        let vp = Viewport::new(800.0, 600.0);
        let p = Vec2::new(200.0, 450.0);
        let e = logical_to_edit(p, vp);
        assert_eq!(e, Vec2::new(0.25, 0.75));
        assert_eq!(edit_to_logical(e, vp), p);
    }

    #[test]
    fn top_left_pixel_is_near_shader_top() {
        let c = pixel_center_to_shader(0, 0, 4, 2);
        assert_eq!(c, Vec2::new(0.125, 0.75));
        let c = pixel_center_to_shader(3, 1, 4, 2);
        assert_eq!(c, Vec2::new(0.875, 0.25));
    }
}
