//! Clock port used to timestamp transcript turns.

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}

/// Wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        Utc::now().timestamp_millis().max(0) as u64
    }
}

/// Manually driven clock for deterministic runs.
///
/// Each reading advances the clock by `step` milliseconds.
pub struct FixedClock {
    now: AtomicU64,
    step: u64,
}

impl FixedClock {
    pub fn new(start: u64) -> Self {
        Self {
            now: AtomicU64::new(start),
            step: 0,
        }
    }

    pub fn with_step(mut self, step: u64) -> Self {
        self.step = step;
        self
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
        self.now.fetch_add(self.step, Ordering::Relaxed)
    }
}
