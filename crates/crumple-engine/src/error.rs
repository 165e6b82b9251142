//! Error taxonomy.
//!
//! Mapping math is total and never fails. Faults only originate at the
//! configuration boundary and at the two asynchronous host edges (frame
//! capture and input forwarding), and the latter are always recoverable.

use crate::host::ForwardedEvent;

/// Invalid configuration or an over-sized rasterizer submission.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("lens capacity must be at least 1")]
    ZeroCapacity,
    #[error("lens capacity {capacity} exceeds rasterizer maximum {max}")]
    CapacityExceedsRasterizer { capacity: usize, max: usize },
    #[error("too many lenses for rasterizer: {count} submitted, maximum {max}")]
    TooManyLenses { count: usize, max: usize },
    #[error("invalid sigma bounds: min {min} must be positive and not above max {max}")]
    InvalidSigmaBounds { min: f32, max: f32 },
    #[error("invalid value for `{field}`: {value}")]
    InvalidValue { field: &'static str, value: f32 },
    #[error("invalid viewport {width}x{height} @ {scale_factor}x")]
    InvalidViewport { width: f32, height: f32, scale_factor: f32 },
}

/// Frame capture failure. The last good frame stays on screen.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error("capture unavailable: {reason}")]
    Unavailable { reason: String },
}

impl CaptureError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable { reason: reason.into() }
    }
}

/// An input event that neither delivery tier accepted. The event is dropped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ForwardError {
    #[error("input forwarding failed for {event:?}")]
    Failed { event: ForwardedEvent },
}
