use crate::coords::space::{edit_to_shader, logical_to_edit, shader_to_edit};
use crate::coords::{Rect, Vec2, Viewport};

use super::Warp;

/// Shader-space source coordinate sampled at a shader-space display point,
/// clamped into the unit square.
///
/// This is the exact forward mapping the rasterizer evaluates, so the returned
/// point is what the pixel under the cursor shows (modulo the clamp, which only
/// affects points the rasterizer draws black).
#[inline]
pub fn source_point_for(display: Vec2, warp: &Warp) -> Vec2 {
    warp.map(display).clamp(Vec2::zero(), Vec2::splat(1.0))
}

/// Translates a pointer position on a surface into the source's
/// device-independent pixel box.
///
/// `pos` is in logical surface pixels; `source` is the source's DIP rectangle
/// (top-left origin). The result always lies inside `source`'s closed bounds.
pub fn screen_to_source(pos: Vec2, viewport: Viewport, warp: &Warp, source: Rect) -> Vec2 {
    let display = edit_to_shader(logical_to_edit(pos, viewport));
    let sampled = source_point_for(display, warp);
    source.point_at(shader_to_edit(sampled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warp::{map_forward, WarpLens};

    fn wl(x: f32, y: f32, sigma: f32, strength: f32) -> WarpLens {
        WarpLens { center: Vec2::new(x, y), sigma, strength }
    }

    #[test]
    fn identity_maps_by_size_ratio_only() {
        let vp = Viewport::new(800.0, 600.0);
        let src = Rect::from_size(1600.0, 900.0);
        let out = screen_to_source(Vec2::new(200.0, 150.0), vp, &Warp::identity(), src);
        assert!((out.x - 400.0).abs() < 1e-3);
        assert!((out.y - 225.0).abs() < 1e-3);
    }

    #[test]
    fn agrees_with_forward_mapping() {
        let warp = Warp::new(0.8, vec![wl(0.4, 0.6, 0.15, 2.5), wl(0.55, 0.45, 0.1, 1.0)]);
        let vp = Viewport::new(640.0, 480.0);
        let src = Rect::from_size(640.0, 480.0);
        for (px, py) in [(100.0, 100.0), (256.0, 192.0), (320.0, 240.0), (500.0, 400.0)] {
            let pos = Vec2::new(px, py);
            let display = edit_to_shader(logical_to_edit(pos, vp));
            let expected = map_forward(display, &warp.lenses, warp.base_scale)
                .clamp(Vec2::zero(), Vec2::splat(1.0));
            let expected = src.point_at(shader_to_edit(expected));
            assert_eq!(screen_to_source(pos, vp, &warp, src), expected);
        }
    }

    #[test]
    fn zoomed_out_corner_is_clamped_into_source() {
        // base_scale < 1 pushes the corners outside the source.
        let warp = Warp::new(0.5, Vec::new());
        let vp = Viewport::new(100.0, 100.0);
        let src = Rect::from_size(300.0, 200.0);
        let out = screen_to_source(Vec2::new(0.0, 0.0), vp, &warp, src);
        assert_eq!(out, Vec2::new(0.0, 0.0));
        let out = screen_to_source(Vec2::new(100.0, 100.0), vp, &warp, src);
        assert_eq!(out, Vec2::new(300.0, 200.0));
    }

    #[test]
    fn vertical_axis_is_not_mirrored() {
        // A point near the top of the surface lands near the top of the source.
        let vp = Viewport::new(100.0, 100.0);
        let src = Rect::from_size(100.0, 100.0);
        let out = screen_to_source(Vec2::new(50.0, 10.0), vp, &Warp::identity(), src);
        assert!((out.y - 10.0).abs() < 1e-3);
    }
}
