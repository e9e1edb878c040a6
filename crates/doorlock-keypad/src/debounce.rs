//! Edge-triggered debouncing of scanned key symbols.

use std::time::Duration;

use tracing::trace;

/// What a single scan meant after debouncing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceOutcome {
    /// A key that was not being reported is now down. Reported once.
    NewPress(char),

    /// The last reported key is still down.
    ///
    /// `settled` is true once the key has been held for the whole debounce
    /// window. Held keys never repeat.
    Held { settled: bool },

    /// The keypad went quiet after a press; the next press will be reported.
    Released,

    /// Nothing pressed, nothing pending.
    Idle,
}

impl DebounceOutcome {
    /// The symbol to report, if this scan produced a new press.
    pub fn new_press(&self) -> Option<char> {
        match self {
            Self::NewPress(symbol) => Some(*symbol),
            _ => None,
        }
    }
}

/// Debounce bookkeeping for one keypad.
#[derive(Debug, Clone)]
pub struct DebounceState {
    last_reported: Option<char>,
    changed_at_ms: u64,
    window: Duration,
}

impl DebounceState {
    pub fn new(window: Duration) -> Self {
        Self {
            last_reported: None,
            changed_at_ms: 0,
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// The key last reported as a new press and not yet released.
    pub fn last_reported(&self) -> Option<char> {
        self.last_reported
    }

    /// Feed one raw scan result taken at `now_ms`.
    ///
    /// ```
    /// use std::time::Duration;
    /// use doorlock_keypad::{DebounceOutcome, DebounceState};
    ///
    /// let mut state = DebounceState::new(Duration::from_millis(50));
    /// assert_eq!(state.observe(Some('5'), 0), DebounceOutcome::NewPress('5'));
    /// assert_eq!(state.observe(Some('5'), 10), DebounceOutcome::Held { settled: false });
    /// assert_eq!(state.observe(Some('5'), 60), DebounceOutcome::Held { settled: true });
    /// assert_eq!(state.observe(None, 70), DebounceOutcome::Released);
    /// assert_eq!(state.observe(Some('5'), 80), DebounceOutcome::NewPress('5'));
    /// ```
    pub fn observe(&mut self, scanned: Option<char>, now_ms: u64) -> DebounceOutcome {
        match (scanned, self.last_reported) {
            (Some(symbol), Some(last)) if symbol == last => {
                let held_ms = now_ms.saturating_sub(self.changed_at_ms);
                let settled = u128::from(held_ms) > self.window.as_millis();
                trace!(%symbol, held_ms, settled, "key held");
                DebounceOutcome::Held { settled }
            }
            (Some(symbol), _) => {
                self.last_reported = Some(symbol);
                self.changed_at_ms = now_ms;
                DebounceOutcome::NewPress(symbol)
            }
            (None, Some(_)) => {
                self.last_reported = None;
                DebounceOutcome::Released
            }
            (None, None) => DebounceOutcome::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> DebounceState {
        DebounceState::new(Duration::from_millis(50))
    }

    #[test]
    fn test_first_press_is_reported() {
        let mut state = state();
        assert_eq!(state.observe(Some('1'), 100), DebounceOutcome::NewPress('1'));
        assert_eq!(state.last_reported(), Some('1'));
    }

    #[test]
    fn test_held_key_is_suppressed_inside_and_after_window() {
        let mut state = state();
        state.observe(Some('1'), 0);

        assert_eq!(state.observe(Some('1'), 50), DebounceOutcome::Held { settled: false });
        assert_eq!(state.observe(Some('1'), 51), DebounceOutcome::Held { settled: true });
        assert_eq!(
            state.observe(Some('1'), 60_000).new_press(),
            None,
            "holding never repeats"
        );
    }

    #[test]
    fn test_different_key_while_held_is_new_press() {
        let mut state = state();
        state.observe(Some('1'), 0);
        assert_eq!(state.observe(Some('2'), 5), DebounceOutcome::NewPress('2'));
        assert_eq!(state.observe(Some('2'), 10), DebounceOutcome::Held { settled: false });
    }

    #[test]
    fn test_release_rearms() {
        let mut state = state();
        state.observe(Some('#'), 0);
        assert_eq!(state.observe(None, 10), DebounceOutcome::Released);
        assert_eq!(state.observe(None, 20), DebounceOutcome::Idle);
        assert_eq!(state.observe(Some('#'), 30), DebounceOutcome::NewPress('#'));
    }

    #[test]
    fn test_idle_without_press() {
        let mut state = state();
        assert_eq!(state.observe(None, 0), DebounceOutcome::Idle);
        assert_eq!(state.last_reported(), None);
    }
}
