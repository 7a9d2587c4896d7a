//! Tick clock.
//!
//! The engine is cooperative: instead of a background timer firing
//! callbacks, a [`Clock`] tracks deadlines and reports how many ticks have
//! come due when the host pumps the engine. Time is passed in explicitly,
//! which keeps scheduling deterministic under test.

use std::time::{Duration, Instant};

/// Fixed-interval deadline accumulator.
///
/// Ticks are strictly sequential: `advance` returns how many whole
/// intervals elapsed and moves the deadline past `now`, so a tick is never
/// reported twice and none are dropped while the clock lives. Replacing
/// the clock discards its pending deadline and starts a fresh interval.
#[derive(Debug, Clone)]
pub struct Clock {
    interval: Duration,
    next_deadline: Instant,
}

impl Clock {
    /// Create a clock whose first deadline is `now + interval`.
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_deadline: now + interval,
        }
    }

    /// Interval between ticks.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the next tick comes due.
    pub fn next_deadline(&self) -> Instant {
        self.next_deadline
    }

    /// Number of ticks due at `now`.
    ///
    /// Advances the deadline by one interval per reported tick; a pump
    /// that arrives late catches up rather than skipping generations.
    pub fn advance(&mut self, now: Instant) -> u64 {
        let mut due = 0;
        while self.next_deadline <= now {
            self.next_deadline += self.interval;
            due += 1;
        }
        due
    }
}
