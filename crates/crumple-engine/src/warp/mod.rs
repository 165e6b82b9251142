//! Lens-warp mapping.
//!
//! [`map_forward`] is the single source of truth for where a displayed point
//! samples the source. The rasterizer calls it once per output pixel and the
//! interaction mapping calls it once per pointer sample, so what the user
//! clicks is always what they see.

mod interaction;
mod mapper;
mod mask;

pub use interaction::{screen_to_source, source_point_for};
pub use mapper::{attenuate, base_map, map_forward, Warp, WarpLens};
pub use mask::mask_at;
