//! Boundary contract with the host platform.
//!
//! The engine never captures frames or injects input itself. Hosts implement
//! [`FrameSource`] and [`InputSink`]; the surface layer drives them.

use async_trait::async_trait;
use image::RgbaImage;

use crate::error::{CaptureError, ForwardError};
use crate::input::MouseButton;

/// Opaque identifier of a capturable / input-receiving source.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SourceHandle(pub u64);

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// Input event in the source's device-independent pixel space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ForwardedEvent {
    Pointer {
        kind: PointerKind,
        x: f32,
        y: f32,
        button: MouseButton,
        click_count: u32,
    },
    Wheel {
        x: f32,
        y: f32,
        delta_x: f32,
        delta_y: f32,
    },
}

impl ForwardedEvent {
    pub fn position(&self) -> (f32, f32) {
        match *self {
            ForwardedEvent::Pointer { x, y, .. } | ForwardedEvent::Wheel { x, y, .. } => (x, y),
        }
    }
}

/// Produces the current raster of a source.
#[async_trait]
pub trait FrameSource: Send + Sync {
    async fn capture_frame(&self, source: SourceHandle) -> Result<RgbaImage, CaptureError>;
}

/// Receives synthesized input events.
///
/// Both tiers report failure as `false`, never by panicking.
#[async_trait]
pub trait InputSink: Send + Sync {
    /// Primary delivery path.
    async fn send_pointer_event(&self, source: SourceHandle, event: &ForwardedEvent) -> bool;

    /// Secondary path tried when the primary one refuses the event.
    async fn send_fallback(&self, source: SourceHandle, event: &ForwardedEvent) -> bool {
        let _ = (source, event);
        false
    }
}

/// Result of delivering one event through the two-tier policy.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryOutcome {
    Delivered,
    FellBackAndDelivered,
    Failed(ForwardError),
}

impl DeliveryOutcome {
    #[inline]
    pub fn is_delivered(&self) -> bool {
        !matches!(self, DeliveryOutcome::Failed(_))
    }
}

/// Delivers `event` via the primary path, then the fallback path.
pub async fn deliver(
    sink: &dyn InputSink,
    source: SourceHandle,
    event: ForwardedEvent,
) -> DeliveryOutcome {
    if sink.send_pointer_event(source, &event).await {
        return DeliveryOutcome::Delivered;
    }
    log::debug!("primary input path refused {event:?} for {source:?}, trying fallback");
    if sink.send_fallback(source, &event).await {
        return DeliveryOutcome::FellBackAndDelivered;
    }
    log::warn!("dropping input event {event:?} for {source:?}: no delivery path accepted it");
    DeliveryOutcome::Failed(ForwardError::Failed { event })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sink {
        primary: bool,
        fallback: Option<bool>,
    }

    #[async_trait]
    impl InputSink for Sink {
        async fn send_pointer_event(&self, _: SourceHandle, _: &ForwardedEvent) -> bool {
            self.primary
        }

        async fn send_fallback(&self, _: SourceHandle, _: &ForwardedEvent) -> bool {
            self.fallback.unwrap_or(false)
        }
    }

    struct PrimaryOnly;

    #[async_trait]
    impl InputSink for PrimaryOnly {
        async fn send_pointer_event(&self, _: SourceHandle, _: &ForwardedEvent) -> bool {
            false
        }
    }

    fn wheel() -> ForwardedEvent {
        ForwardedEvent::Wheel { x: 1.0, y: 2.0, delta_x: 0.0, delta_y: 40.0 }
    }

    #[tokio::test]
    async fn primary_success_is_delivered() {
        let sink = Sink { primary: true, fallback: None };
        assert_eq!(deliver(&sink, SourceHandle(1), wheel()).await, DeliveryOutcome::Delivered);
    }

    #[tokio::test]
    async fn fallback_success_is_reported() {
        let sink = Sink { primary: false, fallback: Some(true) };
        assert_eq!(
            deliver(&sink, SourceHandle(1), wheel()).await,
            DeliveryOutcome::FellBackAndDelivered
        );
    }

    #[tokio::test]
    async fn both_tiers_failing_is_typed_failure() {
        let outcome = deliver(&PrimaryOnly, SourceHandle(1), wheel()).await;
        assert_eq!(outcome, DeliveryOutcome::Failed(ForwardError::Failed { event: wheel() }));
        assert!(!outcome.is_delivered());
    }
}
