//! Input primitives.
//!
//! Platform-agnostic; hosts translate their window-system events into
//! [`PointerEvent`]s relative to the surface they hit.

mod types;

pub use types::{Modifiers, MouseButton, MouseWheelDelta, PointerEvent};
