//! Monotonic clock adapter.
//!
//! Supplies the `now` the control loop hands to
//! [`RoastService`](crate::app::service::RoastService).  Backed by
//! `std::time::Instant`; tests inject durations directly instead.

use std::time::{Duration, Instant};

use crate::app::ports::TimePort;

/// Uptime measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl TimePort for MonotonicClock {
    fn uptime(&self) -> Duration {
        self.start.elapsed()
    }
}
