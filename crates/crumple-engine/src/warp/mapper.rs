use crate::config::{BASE_SCALE_FLOOR, SIGMA_FLOOR};
use crate::coords::space::edit_to_shader;
use crate::coords::Vec2;
use crate::lens::{Lens, LensField};

/// A lens packed for the warp: center already in shader space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WarpLens {
    pub center: Vec2,
    pub sigma: f32,
    pub strength: f32,
}

impl From<&Lens> for WarpLens {
    #[inline]
    fn from(lens: &Lens) -> Self {
        Self {
            center: edit_to_shader(lens.center),
            sigma: lens.sigma,
            strength: lens.strength,
        }
    }
}

/// Snapshot of everything the forward mapping depends on.
///
/// Built once per frame (or per gesture sample) from a surface's lens field and
/// base scale; the rasterizer and the interaction mapping consume the same value.
#[derive(Debug, Clone, PartialEq)]
pub struct Warp {
    pub base_scale: f32,
    pub lenses: Vec<WarpLens>,
}

impl Warp {
    pub fn new(base_scale: f32, lenses: Vec<WarpLens>) -> Self {
        Self { base_scale, lenses }
    }

    /// Packs a lens field in application order.
    pub fn from_field(field: &LensField, base_scale: f32) -> Self {
        Self::new(base_scale, field.iter().map(WarpLens::from).collect())
    }

    /// No lenses, unit scale: the identity mapping.
    pub fn identity() -> Self {
        Self::new(1.0, Vec::new())
    }

    #[inline]
    pub fn map(&self, u: Vec2) -> Vec2 {
        map_forward(u, &self.lenses, self.base_scale)
    }
}

/// Uniform scale about `(0.5, 0.5)`. `base_scale < 1` zooms in.
#[inline]
pub fn base_map(u: Vec2, base_scale: f32) -> Vec2 {
    let s = base_scale.max(BASE_SCALE_FLOOR);
    (u - Vec2::splat(0.5)) / s + Vec2::splat(0.5)
}

/// One lens step: pulls `u` toward the lens center by a Gaussian-attenuated factor.
///
/// The multiplier is `1 / (1 + k·exp(-r²/2s²))`; it is `1/(1+k)` at the center
/// and tends to 1 far away, which magnifies content around the center.
#[inline]
pub fn attenuate(u: Vec2, lens: &WarpLens) -> Vec2 {
    let d = u - lens.center;
    let r2 = d.dot(d);
    let s = lens.sigma.max(SIGMA_FLOOR);
    let m = 1.0 / (1.0 + lens.strength * (-r2 / (2.0 * s * s)).exp());
    lens.center + d * m
}

/// Forward mapping from a shader-space display coordinate to the shader-space
/// source coordinate it samples.
///
/// Base map first, then every lens in order, each acting on the previous
/// output. The result may fall outside the unit square; callers decide how to
/// treat that (black for rendering, clamp for interaction).
pub fn map_forward(u: Vec2, lenses: &[WarpLens], base_scale: f32) -> Vec2 {
    lenses
        .iter()
        .fold(base_map(u, base_scale), |acc, lens| attenuate(acc, lens))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    fn wl(x: f32, y: f32, sigma: f32, strength: f32) -> WarpLens {
        WarpLens { center: Vec2::new(x, y), sigma, strength }
    }

    // ── identity ──────────────────────────────────────────────────────────

    #[test]
    fn zero_lenses_unit_scale_is_identity() {
        for i in 0..=10 {
            for j in 0..=10 {
                let u = Vec2::new(i as f32 / 10.0, j as f32 / 10.0);
                assert!(close(map_forward(u, &[], 1.0), u));
            }
        }
    }

    #[test]
    fn zero_strength_lens_is_identity() {
        let u = Vec2::new(0.3, 0.8);
        assert!(close(map_forward(u, &[wl(0.4, 0.7, 0.2, 0.0)], 1.0), u));
    }

    // ── base map ──────────────────────────────────────────────────────────

    #[test]
    fn base_map_keeps_center_fixed() {
        assert!(close(base_map(Vec2::splat(0.5), 0.3), Vec2::splat(0.5)));
    }

    #[test]
    fn base_map_floors_degenerate_scale() {
        let a = base_map(Vec2::new(0.6, 0.5), 0.0);
        let b = base_map(Vec2::new(0.6, 0.5), BASE_SCALE_FLOOR);
        assert_eq!(a, b);
        assert!(a.is_finite());
    }

    // ── concrete scenarios ────────────────────────────────────────────────

    #[test]
    fn lens_center_maps_to_itself() {
        let lenses = [wl(0.5, 0.5, 0.25, 2.0)];
        assert!(close(map_forward(Vec2::splat(0.5), &lenses, 0.8), Vec2::splat(0.5)));
    }

    #[test]
    fn off_center_point_matches_worked_example() {
        let lenses = [wl(0.5, 0.5, 0.25, 2.0)];
        let out = map_forward(Vec2::new(0.75, 0.5), &lenses, 0.8);
        assert!((out.x - 0.6631).abs() < 1e-3, "x = {}", out.x);
        assert!((out.y - 0.5).abs() < EPS);
    }

    // ── composition ───────────────────────────────────────────────────────

    #[test]
    fn lens_order_matters() {
        let l1 = wl(0.45, 0.5, 0.1, 3.0);
        let l2 = wl(0.55, 0.52, 0.08, 2.0);
        let u = Vec2::new(0.5, 0.5);
        let a = map_forward(u, &[l1, l2], 1.0);
        let b = map_forward(u, &[l2, l1], 1.0);
        assert!(!close(a, b), "{a:?} vs {b:?}");
    }

    #[test]
    fn displacement_grows_with_strength() {
        let u = Vec2::new(0.6, 0.55);
        let mut last = 0.0;
        for k in [0.0, 0.5, 1.0, 2.0, 3.0, 4.0] {
            let out = map_forward(u, &[wl(0.5, 0.5, 0.2, k)], 1.0);
            let disp = (out - u).length();
            assert!(disp >= last, "k = {k}: {disp} < {last}");
            last = disp;
        }
        assert!(last > 0.0);
    }

    #[test]
    fn tiny_sigma_is_total() {
        let out = map_forward(Vec2::new(0.2, 0.2), &[wl(0.2, 0.2, 0.0, 4.0)], 1.0);
        assert!(out.is_finite());
    }

    #[test]
    fn warp_from_field_flips_centers_once() {
        let mut field = LensField::new(4).unwrap();
        field.push(Lens::new(Vec2::new(0.25, 0.1), 0.2, 1.0));
        let warp = Warp::from_field(&field, 0.9);
        assert_eq!(warp.lenses[0].center, Vec2::new(0.25, 0.9));
        assert_eq!(warp.base_scale, 0.9);
    }
}
