//! Per-surface capture coordination.
//!
//! At most one capture is in flight per surface. Requests arriving meanwhile
//! collapse into a single pending rerun. Switching the source bumps an epoch
//! so results for the old source are discarded on arrival.

use std::time::{Duration, Instant};

use image::RgbaImage;

use crumple_engine::error::CaptureError;
use crumple_engine::host::SourceHandle;
use crumple_engine::time::CaptureCadence;

/// Proof that a capture was started; hand it back with the result.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CaptureTicket {
    pub source: SourceHandle,
    epoch: u64,
    generation: u64,
}

/// What happened to a completed capture.
#[derive(Debug)]
pub enum CaptureOutcome {
    /// Newest result for the current source; display it.
    Applied(RgbaImage),
    /// Result for a superseded source or an older generation.
    Discarded,
    /// Host could not produce a frame; keep showing the last good one.
    Failed(CaptureError),
}

#[derive(Debug)]
pub struct CaptureSlot {
    cadence: CaptureCadence,
    source: Option<SourceHandle>,
    epoch: u64,
    next_generation: u64,
    applied_generation: Option<u64>,
    in_flight: Option<u64>,
    pending: bool,
}

impl CaptureSlot {
    pub fn new(interval: Duration) -> Self {
        Self {
            cadence: CaptureCadence::new(interval),
            source: None,
            epoch: 0,
            next_generation: 0,
            applied_generation: None,
            in_flight: None,
            pending: false,
        }
    }

    #[inline]
    pub fn source(&self) -> Option<SourceHandle> {
        self.source
    }

    #[inline]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether a coalesced request is waiting for the next opportunity.
    #[inline]
    pub fn has_pending(&self) -> bool {
        self.pending
    }

    /// Rebinds the slot to `source` (or detaches it), invalidating any
    /// capture in flight.
    pub fn set_source(&mut self, source: Option<SourceHandle>) {
        self.epoch += 1;
        self.source = source;
        self.in_flight = None;
        self.applied_generation = None;
        self.pending = source.is_some();
        self.cadence.reset();
        log::debug!("capture slot rebound to {source:?} (epoch {})", self.epoch);
    }

    /// Marks that the source content changed and should be recaptured.
    pub fn invalidate_content(&mut self) {
        if self.source.is_some() {
            self.pending = true;
        }
    }

    /// Tries to start a capture at `now`.
    ///
    /// Returns `None` when no source is bound, when a capture is already in
    /// flight (the request is coalesced into a pending rerun), or when the
    /// cadence has not elapsed (also left pending).
    pub fn request(&mut self, now: Instant) -> Option<CaptureTicket> {
        let source = self.source?;
        if self.in_flight.is_some() || !self.cadence.try_acquire(now) {
            self.pending = true;
            return None;
        }
        let generation = self.next_generation;
        self.next_generation += 1;
        self.in_flight = Some(generation);
        self.pending = false;
        Some(CaptureTicket { source, epoch: self.epoch, generation })
    }

    /// Like [`request`](Self::request) but only when something is pending.
    pub fn request_pending(&mut self, now: Instant) -> Option<CaptureTicket> {
        if self.pending { self.request(now) } else { None }
    }

    /// Settles a capture started with `ticket`.
    pub fn complete(
        &mut self,
        ticket: CaptureTicket,
        result: Result<RgbaImage, CaptureError>,
    ) -> CaptureOutcome {
        if ticket.epoch != self.epoch {
            log::debug!("discarding capture for superseded source {:?}", ticket.source);
            return CaptureOutcome::Discarded;
        }
        if self.in_flight == Some(ticket.generation) {
            self.in_flight = None;
        }
        if self.applied_generation.is_some_and(|g| ticket.generation <= g) {
            log::debug!("discarding stale capture generation {}", ticket.generation);
            return CaptureOutcome::Discarded;
        }
        match result {
            Ok(image) => {
                self.applied_generation = Some(ticket.generation);
                CaptureOutcome::Applied(image)
            }
            Err(err) => {
                log::warn!("capture of {:?} failed: {err}", ticket.source);
                // Retry on the next cadence tick.
                self.pending = true;
                CaptureOutcome::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: SourceHandle = SourceHandle(7);

    fn slot() -> CaptureSlot {
        let mut s = CaptureSlot::new(Duration::from_millis(10));
        s.set_source(Some(SRC));
        s
    }

    fn frame(w: u32) -> Result<RgbaImage, CaptureError> {
        Ok(RgbaImage::new(w, 1))
    }

    // ── request ───────────────────────────────────────────────────────────

    #[test]
    fn no_source_no_capture() {
        let mut s = CaptureSlot::new(Duration::ZERO);
        assert!(s.request(Instant::now()).is_none());
        assert!(!s.has_pending());
    }

    #[test]
    fn second_request_while_in_flight_is_coalesced() {
        let t0 = Instant::now();
        let mut s = slot();
        let ticket = s.request(t0).unwrap();
        assert!(s.request(t0 + Duration::from_secs(1)).is_none());
        assert!(s.request(t0 + Duration::from_secs(2)).is_none());
        assert!(s.has_pending());

        assert!(matches!(s.complete(ticket, frame(1)), CaptureOutcome::Applied(_)));
        assert!(!s.is_in_flight());
        // Exactly one rerun, not one per coalesced request.
        let rerun = s.request_pending(t0 + Duration::from_secs(3)).unwrap();
        assert!(s.request_pending(t0 + Duration::from_secs(3)).is_none());
        assert!(matches!(s.complete(rerun, frame(2)), CaptureOutcome::Applied(_)));
        assert!(!s.has_pending());
    }

    #[test]
    fn cadence_throttles_requests() {
        let t0 = Instant::now();
        let mut s = slot();
        let ticket = s.request(t0).unwrap();
        s.complete(ticket, frame(1));
        assert!(s.request(t0 + Duration::from_millis(5)).is_none());
        assert!(s.has_pending());
        assert!(s.request(t0 + Duration::from_millis(10)).is_some());
    }

    // ── cancellation ──────────────────────────────────────────────────────

    #[test]
    fn result_for_superseded_source_is_discarded() {
        let t0 = Instant::now();
        let mut s = slot();
        let old = s.request(t0).unwrap();
        s.set_source(Some(SourceHandle(8)));
        let new = s.request(t0).unwrap();
        assert_eq!(new.source, SourceHandle(8));

        assert!(matches!(s.complete(old, frame(1)), CaptureOutcome::Discarded));
        // The stale result must not have cleared the new in-flight capture.
        assert!(s.is_in_flight());
        assert!(matches!(s.complete(new, frame(2)), CaptureOutcome::Applied(_)));
    }

    #[test]
    fn duplicate_completion_is_discarded() {
        let mut s = slot();
        let ticket = s.request(Instant::now()).unwrap();
        assert!(matches!(s.complete(ticket, frame(1)), CaptureOutcome::Applied(_)));
        assert!(matches!(s.complete(ticket, frame(1)), CaptureOutcome::Discarded));
    }

    #[test]
    fn detaching_source_stops_captures() {
        let mut s = slot();
        s.set_source(None);
        assert!(s.request(Instant::now()).is_none());
        s.invalidate_content();
        assert!(!s.has_pending());
    }

    // ── failure ───────────────────────────────────────────────────────────

    #[test]
    fn failure_frees_slot_and_schedules_retry() {
        let mut s = slot();
        let ticket = s.request(Instant::now()).unwrap();
        let outcome = s.complete(ticket, Err(CaptureError::unavailable("not ready")));
        assert!(matches!(outcome, CaptureOutcome::Failed(CaptureError::Unavailable { .. })));
        assert!(!s.is_in_flight());
        assert!(s.has_pending());
    }
}
