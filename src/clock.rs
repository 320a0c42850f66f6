//! Time source abstraction for motion simulation.
//!
//! The simulated motor samples its profile against "now minus move start".
//! Routing that through [`Clock`] lets tests drive time explicitly with
//! [`MockClock`] while a running system uses [`SystemClock`].

use core::cell::Cell;

/// Monotonic time source with microsecond resolution.
pub trait Clock {
    /// Microseconds since an arbitrary, fixed origin.
    fn now_us(&self) -> u64;

    /// Seconds elapsed since `since_us`.
    ///
    /// Saturates at zero if `since_us` lies in the future.
    fn elapsed_secs(&self, since_us: u64) -> f64 {
        self.now_us().saturating_sub(since_us) as f64 / 1_000_000.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

/// Manually advanced clock for deterministic tests and host simulation.
///
/// ```
/// use dividing_head::clock::{Clock, MockClock};
///
/// let clock = MockClock::new();
/// clock.advance_ms(1500);
/// assert_eq!(clock.now_us(), 1_500_000);
/// assert_eq!(clock.elapsed_secs(500_000), 1.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    current_us: Cell<u64>,
}

impl MockClock {
    /// Create a clock at time zero.
    pub fn new() -> Self {
        Self {
            current_us: Cell::new(0),
        }
    }

    /// Create a clock at the given time.
    pub fn with_initial(us: u64) -> Self {
        Self {
            current_us: Cell::new(us),
        }
    }

    /// Set the current time.
    pub fn set(&self, us: u64) {
        self.current_us.set(us);
    }

    /// Advance by a number of microseconds.
    pub fn advance(&self, us: u64) {
        self.current_us.set(self.current_us.get() + us);
    }

    /// Advance by a number of milliseconds.
    pub fn advance_ms(&self, ms: u64) {
        self.advance(ms * 1000);
    }

    /// Advance by a (non-negative) number of seconds.
    pub fn advance_secs(&self, secs: f64) {
        self.advance(libm::round(secs * 1_000_000.0) as u64);
    }
}

impl Clock for MockClock {
    fn now_us(&self) -> u64 {
        self.current_us.get()
    }
}

/// Wall clock backed by [`std::time::Instant`].
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl SystemClock {
    /// Create a clock whose origin is now.
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now_us(&self) -> u64 {
        self.origin.elapsed().as_micros() as u64
    }
}
