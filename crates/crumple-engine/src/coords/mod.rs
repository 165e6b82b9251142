//! Coordinate and geometry types shared across the engine and surfaces.
//!
//! Logical space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! The warp itself runs in normalized shader space; see [`space`] for the
//! conversions.

mod color;
mod rect;
pub mod space;
mod vec2;
mod viewport;

pub use color::ColorRgba;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
