//! Monotonic interval timer.
//!
//! Owned by exactly one component, which both checks and resets it.  An
//! unfired timer is due immediately, so the first health check and the first
//! telemetry report happen on the first tick after boot.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTimer {
    last_fired: Option<u64>,
    period_ms: u64,
}

impl IntervalTimer {
    pub fn new(period_ms: u64) -> Self {
        Self {
            last_fired: None,
            period_ms,
        }
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        match self.last_fired {
            None => true,
            Some(at) => now_ms.saturating_sub(at) >= self.period_ms,
        }
    }

    pub fn reset(&mut self, now_ms: u64) {
        self.last_fired = Some(now_ms);
    }
}
