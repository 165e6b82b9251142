//! Host-facing engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::coords::Viewport;
use crate::error::ConfigError;

/// Smallest base scale the warp will divide by.
pub const BASE_SCALE_FLOOR: f32 = 0.01;

/// Smallest lens spread used by the warp and the mask.
pub const SIGMA_FLOOR: f32 = 1e-5;

/// Smallest arc-length spacing, in logical pixels, between stroke-placed lenses.
pub const STROKE_SPACING_FLOOR_PX: f32 = 0.5;

/// Canonical engine configuration.
///
/// Pixel-valued fields are in logical (device-independent) pixels and are
/// normalized per surface against the shorter logical side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub base_scale: f32,
    pub lens_capacity: usize,
    pub max_raster_lenses: usize,
    pub pick_radius_px: f32,
    pub sigma_min_px: f32,
    pub sigma_max_px: f32,
    pub default_sigma_px: f32,
    pub default_strength: f32,
    pub strength_max: f32,
    pub wheel_step: f32,
    pub reveal_softness: f32,
    pub stroke_radius_px: f32,
    /// Resample spacing as a fraction of `stroke_radius_px`.
    pub stroke_spacing: f32,
    pub stroke_min_step_px: f32,
    pub capture_interval_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_scale: 0.8,
            lens_capacity: 64,
            max_raster_lenses: 64,
            pick_radius_px: 14.0,
            sigma_min_px: 20.0,
            sigma_max_px: 800.0,
            default_sigma_px: 160.0,
            default_strength: 2.0,
            strength_max: 4.0,
            wheel_step: 0.002,
            reveal_softness: 1.0,
            stroke_radius_px: 140.0,
            stroke_spacing: 0.7,
            stroke_min_step_px: 3.0,
            capture_interval_ms: 33,
        }
    }
}

impl EngineConfig {
    /// Checks internal consistency.
    ///
    /// The lens capacity may never exceed the rasterizer maximum, so a full
    /// lens field is always renderable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lens_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.lens_capacity > self.max_raster_lenses {
            return Err(ConfigError::CapacityExceedsRasterizer {
                capacity: self.lens_capacity,
                max: self.max_raster_lenses,
            });
        }
        if !(self.sigma_min_px > 0.0 && self.sigma_min_px <= self.sigma_max_px)
            || !self.sigma_max_px.is_finite()
        {
            return Err(ConfigError::InvalidSigmaBounds {
                min: self.sigma_min_px,
                max: self.sigma_max_px,
            });
        }

        let positive = [
            ("base_scale", self.base_scale),
            ("pick_radius_px", self.pick_radius_px),
            ("default_sigma_px", self.default_sigma_px),
            ("stroke_radius_px", self.stroke_radius_px),
            ("stroke_spacing", self.stroke_spacing),
            ("reveal_softness", self.reveal_softness),
        ];
        for (field, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }

        let non_negative = [
            ("default_strength", self.default_strength),
            ("strength_max", self.strength_max),
            ("wheel_step", self.wheel_step),
            ("stroke_min_step_px", self.stroke_min_step_px),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        let spacing_px = self.stroke_radius_px * self.stroke_spacing;
        if spacing_px < STROKE_SPACING_FLOOR_PX {
            return Err(ConfigError::InvalidValue { field: "stroke_spacing", value: self.stroke_spacing });
        }
        if self.default_strength > self.strength_max {
            return Err(ConfigError::InvalidValue {
                field: "default_strength",
                value: self.default_strength,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn capture_interval(&self) -> Duration {
        Duration::from_millis(self.capture_interval_ms)
    }

    /// Normalized sigma bounds for a surface.
    pub fn sigma_bounds(&self, viewport: Viewport) -> (f32, f32) {
        (viewport.normalize_len(self.sigma_min_px), viewport.normalize_len(self.sigma_max_px))
    }

    /// Normalized pick radius for a surface.
    #[inline]
    pub fn pick_radius(&self, viewport: Viewport) -> f32 {
        viewport.normalize_len(self.pick_radius_px)
    }

    /// Clamps a normalized sigma into the surface's bounds.
    pub fn clamp_sigma(&self, sigma: f32, viewport: Viewport) -> f32 {
        let (lo, hi) = self.sigma_bounds(viewport);
        sigma.clamp(lo, hi)
    }

    #[inline]
    pub fn clamp_strength(&self, strength: f32) -> f32 {
        strength.clamp(0.0, self.strength_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn capacity_above_rasterizer_is_rejected() {
        let cfg = EngineConfig { lens_capacity: 65, ..Default::default() };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::CapacityExceedsRasterizer { capacity: 65, max: 64 })
        );
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let cfg = EngineConfig { lens_capacity: 0, ..Default::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroCapacity));
    }

    #[test]
    fn inverted_sigma_bounds_are_rejected() {
        let cfg = EngineConfig { sigma_min_px: 900.0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidSigmaBounds { .. })));
    }

    #[test]
    fn nan_base_scale_is_rejected() {
        let cfg = EngineConfig { base_scale: f32::NAN, ..Default::default() };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue { field: "base_scale", .. })
        ));
    }

    #[test]
    fn sub_pixel_stroke_spacing_is_rejected() {
        let cfg = EngineConfig { stroke_spacing: 1e-9, ..Default::default() };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue { field: "stroke_spacing", .. })
        ));
        // 140 px radius at 0.004 spacing is 0.56 px.
        let cfg = EngineConfig { stroke_spacing: 0.004, ..Default::default() };
        cfg.validate().unwrap();
    }

    #[test]
    fn sigma_bounds_follow_shorter_side() {
        let cfg = EngineConfig::default();
        let (lo, hi) = cfg.sigma_bounds(Viewport::new(1600.0, 800.0));
        assert_eq!(lo, 20.0 / 800.0);
        assert_eq!(hi, 1.0);
        assert_eq!(cfg.clamp_sigma(5.0, Viewport::new(1600.0, 800.0)), 1.0);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: EngineConfig =
            serde_json::from_str(r#"{ "lens_capacity": 16, "pick_radius_px": 10 }"#).unwrap();
        assert_eq!(cfg.lens_capacity, 16);
        assert_eq!(cfg.pick_radius_px, 10.0);
        assert_eq!(cfg.base_scale, 0.8);
        cfg.validate().unwrap();
    }
}
