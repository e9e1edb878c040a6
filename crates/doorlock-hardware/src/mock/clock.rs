//! Manually advanced clock.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use doorlock_core::saturating_millis;

use crate::traits::Clock;

/// A [`Clock`] that only moves when told to.
///
/// Clones share the same time, so a test keeps one copy and gives another to
/// the code under test. `delay` does not advance time; it only counts calls.
///
/// ```
/// use std::time::Duration;
/// use doorlock_hardware::mock::ManualClock;
/// use doorlock_hardware::traits::Clock;
///
/// let clock = ManualClock::new();
/// let shared = clock.clone();
/// clock.advance(Duration::from_millis(250));
/// assert_eq!(shared.now_ms(), 250);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Arc<AtomicU64>,
    delays: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at a given reading.
    pub fn starting_at(now_ms: u64) -> Self {
        let clock = Self::new();
        clock.set_ms(now_ms);
        clock
    }

    pub fn advance(&self, duration: Duration) {
        self.now_ms
            .fetch_add(saturating_millis(duration), Ordering::SeqCst);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set_ms(&self, now_ms: u64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    /// Number of `delay` calls so far.
    pub fn delay_count(&self) -> u64 {
        self.delays.load(Ordering::SeqCst)
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }

    fn delay(&self, _duration: Duration) {
        self.delays.fetch_add(1, Ordering::SeqCst);
    }
}
