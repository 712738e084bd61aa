//! Polling timer that drives frame sampling

use std::time::{Duration, Instant};

/// Fixed-period timer polled from the event loop.
///
/// `stop` is idempotent and safe before `start`.
#[derive(Debug, Clone)]
pub struct SamplingTimer {
    period: Duration,
    next_due: Option<Instant>,
}

impl SamplingTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// (Re)arm the timer; the first tick is one period from `now`
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    /// True once per elapsed period while running. Missed periods are not
    /// replayed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.period);
                true
            }
            _ => false,
        }
    }
}
