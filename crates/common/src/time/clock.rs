//! Monotonic clock abstraction

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Trait for time operations to enable testing
///
/// This trait provides an abstraction over time operations, allowing code
/// to work with either real system time or mocked time for testing.
pub trait Clock: Send + Sync {
    /// Get current instant (monotonic time)
    fn now(&self) -> Instant;
}

/// Real system clock implementation for production use
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Implement Clock for Arc<T> where T: Clock for convenient sharing
impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Mock clock for deterministic testing
///
/// Clones share the same elapsed counter, so a test can hand one clone to
/// a cache and advance time through another. A panic while the counter is
/// locked does not poison it for the other clones.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use evictkit_common::time::{Clock, MockClock};
///
/// let clock = MockClock::new();
/// let start = clock.now();
///
/// // Simulate 5 seconds passing
/// clock.advance(Duration::from_secs(5));
///
/// assert_eq!(clock.now().duration_since(start), Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct MockClock {
    start: Instant,
    elapsed: Arc<Mutex<Duration>>,
}

impl MockClock {
    /// Create a new mock clock
    ///
    /// The clock starts at the current real time but only moves when
    /// advanced manually.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Advance the mock clock by a duration
    pub fn advance(&self, duration: Duration) {
        let mut elapsed = self.elapsed.lock().unwrap_or_else(PoisonError::into_inner);
        *elapsed += duration;
    }

    /// Set the mock clock to an absolute elapsed time
    pub fn set_elapsed(&self, duration: Duration) {
        let mut elapsed = self.elapsed.lock().unwrap_or_else(PoisonError::into_inner);
        *elapsed = duration;
    }

    /// Get the time simulated since the clock was created
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.start + self.elapsed()
    }
}
