use std::time::{Duration, Instant};

/// Fixed-interval rate limiter for live captures.
///
/// Callers pass `now` explicitly so cadence decisions are deterministic in
/// tests. A zero interval never throttles.
#[derive(Debug, Clone)]
pub struct CaptureCadence {
    interval: Duration,
    last: Option<Instant>,
}

impl CaptureCadence {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last: None }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a capture may start at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        match self.last {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }

    /// Records a capture start at `now`.
    pub fn mark(&mut self, now: Instant) {
        self.last = Some(now);
    }

    /// `is_due` + `mark` in one step. Returns whether the capture may start.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.mark(now);
            true
        } else {
            false
        }
    }

    /// Forgets the last capture so the next request is due immediately.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Time left until the next capture is due.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.last {
            None => Duration::ZERO,
            Some(last) => self.interval.saturating_sub(now.saturating_duration_since(last)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_request_is_due() {
        let mut c = CaptureCadence::new(Duration::from_millis(33));
        assert!(c.try_acquire(Instant::now()));
    }

    #[test]
    fn second_request_within_interval_is_throttled() {
        let t0 = Instant::now();
        let mut c = CaptureCadence::new(Duration::from_millis(33));
        assert!(c.try_acquire(t0));
        assert!(!c.try_acquire(t0 + Duration::from_millis(10)));
        assert_eq!(c.remaining(t0 + Duration::from_millis(10)), Duration::from_millis(23));
        assert!(c.try_acquire(t0 + Duration::from_millis(33)));
    }

    #[test]
    fn reset_makes_next_request_due() {
        let t0 = Instant::now();
        let mut c = CaptureCadence::new(Duration::from_secs(1));
        c.mark(t0);
        assert!(!c.is_due(t0));
        c.reset();
        assert!(c.is_due(t0));
    }

    #[test]
    fn zero_interval_never_throttles() {
        let t0 = Instant::now();
        let mut c = CaptureCadence::new(Duration::ZERO);
        assert!(c.try_acquire(t0));
        assert!(c.try_acquire(t0));
    }
}
