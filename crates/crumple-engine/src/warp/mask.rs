use crate::config::SIGMA_FLOOR;
use crate::coords::Vec2;

use super::WarpLens;

/// Reveal mask at the unwarped shader-space point `v`.
///
/// Soft union (pointwise maximum) of one Gaussian per lens with spread
/// `sigma · softness`. Independent of the warp output; an empty field yields 0.
pub fn mask_at(v: Vec2, lenses: &[WarpLens], softness: f32) -> f32 {
    let m = lenses.iter().fold(0.0_f32, |acc, lens| {
        let s = (lens.sigma * softness).max(SIGMA_FLOOR);
        let d2 = (v - lens.center).length_squared();
        acc.max((-d2 / (2.0 * s * s)).exp())
    });
    m.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wl(x: f32, y: f32, sigma: f32) -> WarpLens {
        WarpLens { center: Vec2::new(x, y), sigma, strength: 2.0 }
    }

    #[test]
    fn empty_field_masks_everything() {
        assert_eq!(mask_at(Vec2::splat(0.5), &[], 1.0), 0.0);
    }

    #[test]
    fn lens_center_is_fully_revealed() {
        assert_eq!(mask_at(Vec2::new(0.3, 0.3), &[wl(0.3, 0.3, 0.1)], 1.0), 1.0);
    }

    #[test]
    fn mask_is_max_not_sum() {
        let lenses = [wl(0.4, 0.5, 0.1), wl(0.6, 0.5, 0.1)];
        let both = mask_at(Vec2::new(0.5, 0.5), &lenses, 1.0);
        let one = mask_at(Vec2::new(0.5, 0.5), &lenses[..1], 1.0);
        assert!((both - one).abs() < 1e-6);
        assert!(both < 1.0);
    }

    #[test]
    fn softness_widens_falloff() {
        let lenses = [wl(0.5, 0.5, 0.05)];
        let p = Vec2::new(0.6, 0.5);
        assert!(mask_at(p, &lenses, 2.0) > mask_at(p, &lenses, 1.0));
        assert!(mask_at(p, &lenses, 0.0) < 1e-6);
    }

    #[test]
    fn falls_off_with_distance() {
        let lenses = [wl(0.5, 0.5, 0.1)];
        let near = mask_at(Vec2::new(0.52, 0.5), &lenses, 1.0);
        let far = mask_at(Vec2::new(0.8, 0.5), &lenses, 1.0);
        assert!(near > far);
        assert!((0.0..=1.0).contains(&far));
    }
}
