use image::RgbaImage;
use rayon::prelude::*;

use crate::coords::space::pixel_center_to_shader;
use crate::coords::{ColorRgba, Vec2};
use crate::error::ConfigError;
use crate::warp::{mask_at, Warp};

use super::sampler::sample_bilinear;

/// Per-frame inputs to the rasterizer.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameParams {
    pub warp: Warp,
    /// Reveal softness when the reveal mask is enabled.
    pub reveal: Option<f32>,
}

impl FrameParams {
    pub fn new(warp: Warp) -> Self {
        Self { warp, reveal: None }
    }

    pub fn with_reveal(mut self, softness: f32) -> Self {
        self.reveal = Some(softness);
        self
    }
}

/// CPU rasterizer with a fixed lens limit.
///
/// Submissions above `max_lenses` are rejected with
/// [`ConfigError::TooManyLenses`] before any pixel is written.
#[derive(Debug, Clone)]
pub struct Rasterizer {
    max_lenses: usize,
}

impl Rasterizer {
    pub fn new(max_lenses: usize) -> Self {
        Self { max_lenses }
    }

    #[inline]
    pub fn max_lenses(&self) -> usize {
        self.max_lenses
    }

    fn check(&self, params: &FrameParams) -> Result<(), ConfigError> {
        let count = params.warp.lenses.len();
        if count > self.max_lenses {
            log::warn!("rejected frame: {count} lenses, rasterizer maximum {}", self.max_lenses);
            return Err(ConfigError::TooManyLenses { count, max: self.max_lenses });
        }
        Ok(())
    }

    /// Color of a single display point given in shader space.
    ///
    /// Same code path as [`render_into`](Self::render_into); exposed for
    /// point-wise evaluation.
    pub fn shade(source: &RgbaImage, params: &FrameParams, display: Vec2) -> ColorRgba {
        let u = params.warp.map(display);
        if !(0.0..=1.0).contains(&u.x) || !(0.0..=1.0).contains(&u.y) {
            return ColorRgba::black();
        }
        let color = sample_bilinear(source, u);
        match params.reveal {
            Some(softness) => color.scale_rgb(mask_at(display, &params.warp.lenses, softness)),
            None => color,
        }
    }

    /// Rasterizes `source` through the warp into every pixel of `target`.
    pub fn render_into(
        &self,
        source: &RgbaImage,
        params: &FrameParams,
        target: &mut RgbaImage,
    ) -> Result<(), ConfigError> {
        self.check(params)?;

        let (width, height) = target.dimensions();
        if width == 0 || height == 0 {
            return Ok(());
        }
        let stride = width as usize * 4;

        target
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, px) in row.chunks_exact_mut(4).enumerate() {
                    let display = pixel_center_to_shader(x as u32, y as u32, width, height);
                    px.copy_from_slice(&Self::shade(source, params, display).to_rgba8());
                }
            });
        Ok(())
    }

    /// Allocates a `width × height` frame and rasterizes into it.
    pub fn render(
        &self,
        source: &RgbaImage,
        params: &FrameParams,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage, ConfigError> {
        self.check(params)?;
        let mut frame = RgbaImage::new(width, height);
        self.render_into(source, params, &mut frame)?;
        Ok(frame)
    }
}
