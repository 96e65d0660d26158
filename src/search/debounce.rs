//! Settle-interval debouncer.
//!
//! Time is passed in by the caller so the event loop (and tests) decide what
//! "now" is. The debouncer only tracks *whether* and *since when* the query is
//! dirty; the query text itself is read from the session at fire time.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Debouncer {
    interval: Duration,
    dirty_since: Option<Instant>,
}

impl Debouncer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            dirty_since: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Restart the settle window at `now`, dropping any pending invocation.
    pub fn schedule(&mut self, now: Instant) {
        self.dirty_since = Some(now);
    }

    pub fn cancel(&mut self) {
        self.dirty_since = None;
    }

    pub fn is_pending(&self) -> bool {
        self.dirty_since.is_some()
    }

    /// Instant at which the pending invocation becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.dirty_since.map(|t| t + self.interval)
    }

    /// Consume the pending invocation if its window has elapsed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.dirty_since {
            Some(t) if now.saturating_duration_since(t) >= self.interval => {
                self.dirty_since = None;
                true
            }
            _ => false,
        }
    }
}
