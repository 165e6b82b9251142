//! Tokio drivers for the two asynchronous host edges.
//!
//! - [`spawn_capture_loop`] keeps a surface's live frame fresh through a
//!   [`FrameSource`], one capture at a time.
//! - [`Forwarder`] delivers forwarded input through an [`InputSink`] on one
//!   ordered lane per surface.
//!
//! Neither driver holds the surface lock across a host call.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crumple_engine::host::{deliver, DeliveryOutcome, ForwardedEvent, FrameSource, InputSink, SourceHandle};

use crate::board::Dispatched;
use crate::surface::{Surface, SurfaceId};

pub type SharedSurface = Arc<Mutex<Surface>>;

const MIN_TICK: Duration = Duration::from_millis(1);

// ── capture ───────────────────────────────────────────────────────────────

/// Handle to a running capture loop.
pub struct CaptureLoop {
    trigger: Arc<Notify>,
    handle: JoinHandle<()>,
}

impl CaptureLoop {
    /// Requests a capture outside the regular cadence, e.g. after the host
    /// reports a content change.
    pub fn trigger(&self) {
        self.trigger.notify_one();
    }

    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }
}

/// Spawns a capture loop for `surface`.
///
/// Every tick (and every [`CaptureLoop::trigger`]) marks the live source
/// stale. Captures start only when the surface's capture slot allows it;
/// `redraw` receives the surface id whenever a new frame was applied.
pub fn spawn_capture_loop(
    surface: SharedSurface,
    host: Arc<dyn FrameSource>,
    redraw: Option<UnboundedSender<SurfaceId>>,
) -> CaptureLoop {
    let trigger = Arc::new(Notify::new());
    let notified = Arc::clone(&trigger);

    let handle = tokio::spawn(async move {
        let (id, period) = {
            let s = surface.lock().await;
            (s.id(), s.config().capture_interval().max(MIN_TICK))
        };
        log::debug!("capture loop for {id:?} every {period:?}");
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = notified.notified() => {}
            }

            let ticket = {
                let mut s = surface.lock().await;
                s.invalidate_source();
                s.begin_pending_capture(tokio::time::Instant::now().into_std())
            };
            let Some(ticket) = ticket else { continue };

            let result = host.capture_frame(ticket.source).await;

            let applied = surface.lock().await.finish_capture(ticket, result);
            if applied {
                if let Some(tx) = &redraw {
                    if tx.send(id).is_err() {
                        log::debug!("redraw receiver for {id:?} dropped");
                    }
                }
            }
        }
    });

    CaptureLoop { trigger, handle }
}

// ── forwarding ────────────────────────────────────────────────────────────

/// Result of one forwarded event, for telemetry or a status indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardReport {
    pub surface: SurfaceId,
    pub source: SourceHandle,
    pub event: ForwardedEvent,
    pub outcome: DeliveryOutcome,
}

type Lane = UnboundedSender<(SourceHandle, ForwardedEvent)>;

/// Per-surface ordered delivery of forwarded input.
///
/// Events for one surface are delivered strictly in submission order; lanes
/// of different surfaces run independently.
pub struct Forwarder {
    sink: Arc<dyn InputSink>,
    lanes: HashMap<SurfaceId, Lane>,
    reports: Option<UnboundedSender<ForwardReport>>,
}

impl Forwarder {
    pub fn new(sink: Arc<dyn InputSink>) -> Self {
        Self { sink, lanes: HashMap::new(), reports: None }
    }

    pub fn with_reports(mut self, reports: UnboundedSender<ForwardReport>) -> Self {
        self.reports = Some(reports);
        self
    }

    /// Queues the events a dispatch produced. Returns how many were queued.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&mut self, surface: SurfaceId, dispatched: Dispatched) -> usize {
        if dispatched.forwarded.is_empty() {
            return 0;
        }
        let Some(source) = dispatched.source else {
            log::debug!("{surface:?} has no live source; dropping {} event(s)", dispatched.forwarded.len());
            return 0;
        };

        let mut queued = 0;
        for event in dispatched.forwarded {
            let lane = self.lane(surface);
            if lane.send((source, event)).is_err() {
                log::warn!("forwarding lane for {surface:?} closed; dropping {event:?}");
                self.lanes.remove(&surface);
                break;
            }
            queued += 1;
        }
        queued
    }

    /// Closes the lane of `surface` after its queued events are delivered.
    pub fn close(&mut self, surface: SurfaceId) {
        self.lanes.remove(&surface);
    }

    fn lane(&mut self, surface: SurfaceId) -> &Lane {
        let sink = &self.sink;
        let reports = &self.reports;
        self.lanes
            .entry(surface)
            .or_insert_with(|| spawn_lane(surface, Arc::clone(sink), reports.clone()))
    }
}

fn spawn_lane(
    surface: SurfaceId,
    sink: Arc<dyn InputSink>,
    reports: Option<UnboundedSender<ForwardReport>>,
) -> Lane {
    let (tx, mut rx) = mpsc::unbounded_channel::<(SourceHandle, ForwardedEvent)>();
    tokio::spawn(async move {
        while let Some((source, event)) = rx.recv().await {
            let outcome = deliver(sink.as_ref(), source, event).await;
            if let Some(reports) = &reports {
                let _ = reports.send(ForwardReport { surface, source, event, outcome });
            }
        }
        log::debug!("forwarding lane for {surface:?} closed");
    });
    tx
}
