// src/interval.rs
//! Adaptive polling interval: halve on yield, back off by 20% on quiet
//! cycles, clamped to a fixed floor and ceiling.

use std::time::Duration;

/// Polling floor: react fast to an active topic, but no faster.
pub const MIN_INTERVAL: Duration = Duration::from_secs(3 * 60);
/// Polling ceiling when nothing new shows up for a long stretch.
pub const MAX_INTERVAL: Duration = Duration::from_secs(30 * 60);
/// Starting point before any cycle has completed.
pub const INITIAL_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Single-owner interval state. Created once at startup, mutated only
/// by `on_cycle_complete`, read by status reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalController {
    current: Duration,
    min: Duration,
    max: Duration,
}

impl Default for IntervalController {
    fn default() -> Self {
        Self::starting_at(INITIAL_INTERVAL)
    }
}

impl IntervalController {
    /// Controller with the default bounds and a custom starting
    /// interval (clamped into them).
    pub fn starting_at(initial: Duration) -> Self {
        Self::with_bounds(initial, MIN_INTERVAL, MAX_INTERVAL)
    }

    pub fn with_bounds(initial: Duration, min: Duration, max: Duration) -> Self {
        Self {
            current: initial.clamp(min, max),
            min,
            max,
        }
    }

    /// Feed one completed cycle into the controller. The signal is
    /// binary: how many items a cycle yielded does not matter, and a
    /// failed cycle counts as `found_new = false` so sustained failure
    /// backs the rate off instead of hammering the upstream.
    pub fn on_cycle_complete(&mut self, found_new: bool) {
        self.current = if found_new {
            self.current.mul_f64(0.5).max(self.min)
        } else {
            self.current.mul_f64(1.2).min(self.max)
        };
    }

    pub fn current(&self) -> Duration {
        self.current
    }

    /// Current interval rounded to whole minutes, for status reporting.
    pub fn minutes(&self) -> u64 {
        (self.current.as_secs() + 30) / 60
    }
}
