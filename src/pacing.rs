//! Tick pacing.
//!
//! The control loop is strictly sequential: each tick starts, does its
//! work, then waits for the remainder of the sample period. [`TickPacer`]
//! sleeps in short slices so a shutdown signal is observed within tens of
//! milliseconds instead of a full sample period. If a tick overruns the
//! period there is no wait and the next tick starts immediately.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

const SLICE: Duration = Duration::from_millis(50);

/// Sleeps out the remainder of each sample period, interruptibly.
pub struct TickPacer {
    period: Duration,
}

impl TickPacer {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    /// Wait until `tick_start + period`. Returns `false` if `shutdown` was
    /// raised during the wait, `true` once the deadline has passed.
    pub fn pace(&self, tick_start: Instant, shutdown: &AtomicBool) -> bool {
        let deadline = tick_start + self.period;
        loop {
            if shutdown.load(Ordering::Relaxed) {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            thread::sleep((deadline - now).min(SLICE));
        }
    }
}
