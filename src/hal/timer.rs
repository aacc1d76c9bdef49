//! Timer Abstractions
//!
//! Microsecond holds on a general purpose OS. Sleeping alone overshoots by
//! tens of microseconds, so holds end in a busy-wait against a deadline.

use std::thread;
use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;

use crate::config::{SPIN_MARGIN_US, SPIN_THRESHOLD_US};

/// Deadline-based delay that never returns early
///
/// Holds up to [`SPIN_THRESHOLD_US`] spin for their full length. Longer
/// holds sleep until [`SPIN_MARGIN_US`] before the deadline and spin the
/// rest, so the edge that follows stays on time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpinDelay;

impl SpinDelay {
    /// Create a spin delay
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Block until `deadline`
    pub fn wait_until(deadline: Instant) {
        let now = Instant::now();
        if deadline <= now {
            return;
        }

        let remaining = deadline - now;
        let margin = Duration::from_micros(u64::from(SPIN_MARGIN_US));
        if remaining > Duration::from_micros(u64::from(SPIN_THRESHOLD_US)) {
            thread::sleep(remaining - margin);
        }

        while Instant::now() < deadline {
            std::hint::spin_loop();
        }
    }
}

impl DelayNs for SpinDelay {
    fn delay_ns(&mut self, ns: u32) {
        Self::wait_until(Instant::now() + Duration::from_nanos(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        Self::wait_until(Instant::now() + Duration::from_micros(u64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        Self::wait_until(Instant::now() + Duration::from_millis(u64::from(ms)));
    }
}
