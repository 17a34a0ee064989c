//! Monotonic time abstraction
//!
//! Timeouts in the state machine are polled elapsed-time comparisons
//! against recorded timestamps, never scheduled callbacks. The trait
//! abstracts over the host monotonic clock and a manually advanced test
//! clock.

use core::cell::Cell;

/// Monotonic time source in microseconds since an arbitrary start.
pub trait Clock {
    /// Current monotonic time in microseconds.
    fn now_us(&self) -> u64;

    /// Elapsed microseconds since a recorded reference point.
    ///
    /// Saturating, so a reference recorded "in the future" reads as zero
    /// elapsed rather than wrapping.
    fn elapsed_us(&self, reference_us: u64) -> u64 {
        self.now_us().saturating_sub(reference_us)
    }
}

// A shared reference to a clock is itself a clock, so a driving loop
// can own `&ManualClock` while the test advances the original.
impl<C: Clock + ?Sized> Clock for &C {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

/// Manually advanced clock for deterministic tests.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_us: Cell<u64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump to an absolute time.
    pub fn set(&self, us: u64) {
        self.now_us.set(us);
    }

    /// Advance by the given number of microseconds.
    pub fn advance(&self, us: u64) {
        self.now_us.set(self.now_us.get() + us);
    }

    /// Advance by whole seconds (convenience for timeout tests).
    pub fn advance_secs(&self, secs: u64) {
        self.advance(secs * 1_000_000);
    }
}

impl Clock for ManualClock {
    fn now_us(&self) -> u64 {
        self.now_us.get()
    }
}
