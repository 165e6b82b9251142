//! Crumple engine crate.
//!
//! Pure, synchronous lens-warp core: the ordered lens field, the forward warp
//! shared by rendering and interaction, the reveal mask, and a CPU rasterizer.
//! Asynchronous host edges are described by the traits in [`host`].
//!
//! ```
//! use crumple_engine::coords::Vec2;
//! use crumple_engine::warp::{map_forward, WarpLens};
//!
//! let lens = WarpLens { center: Vec2::new(0.5, 0.5), sigma: 0.25, strength: 2.0 };
//! let out = map_forward(Vec2::new(0.75, 0.5), &[lens], 0.8);
//! assert!((out.x - 0.6631).abs() < 1e-3);
//! ```

pub mod config;
pub mod coords;
pub mod error;
pub mod host;
pub mod input;
pub mod lens;
pub mod logging;
pub mod raster;
pub mod time;
pub mod warp;

pub use config::EngineConfig;
pub use error::{CaptureError, ConfigError, ForwardError};
