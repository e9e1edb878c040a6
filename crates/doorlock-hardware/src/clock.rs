//! Wall-clock backed [`Clock`].

use std::time::{Duration, Instant};

use doorlock_core::saturating_millis;

use crate::traits::Clock;

/// Monotonic clock measuring from its own creation.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        saturating_millis(self.origin.elapsed())
    }

    fn delay(&self, duration: Duration) {
        // Busy-wait: settle delays are tens of microseconds.
        let start = Instant::now();
        while start.elapsed() < duration {
            std::hint::spin_loop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now_ms();
        clock.delay(Duration::from_millis(2));
        assert!(clock.now_ms() >= first + 2);
    }
}
