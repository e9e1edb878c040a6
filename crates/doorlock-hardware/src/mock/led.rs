//! In-memory LED pin.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::traits::LedPin;

/// An LED level plus a count of level changes, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MockLed {
    on: Arc<AtomicBool>,
    transitions: Arc<AtomicU64>,
}

impl MockLed {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the level actually changed.
    pub fn transitions(&self) -> u64 {
        self.transitions.load(Ordering::SeqCst)
    }
}

impl LedPin for MockLed {
    fn write(&mut self, on: bool) {
        if self.on.swap(on, Ordering::SeqCst) != on {
            self.transitions.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn is_on(&self) -> bool {
        self.on.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_led_counts_real_changes_only() {
        let mut led = MockLed::new();
        let observer = led.clone();

        led.write(true);
        led.write(true);
        led.toggle();

        assert!(!observer.is_on());
        assert_eq!(observer.transitions(), 2);
    }
}
