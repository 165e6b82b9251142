//! Rasterizer adapter: evaluates the forward warp for every output pixel.

mod rasterizer;
mod sampler;

pub use rasterizer::{FrameParams, Rasterizer};
pub use sampler::sample_bilinear;
