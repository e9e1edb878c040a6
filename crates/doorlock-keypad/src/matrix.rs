//! Row/column scanning keypad.

use std::time::Duration;

use doorlock_core::{KeypadInput, LockConfig, Result};
use doorlock_hardware::{Clock, DeviceInfo, KeypadDevice, MatrixLines};
use tracing::{debug, trace};

use crate::debounce::{DebounceOutcome, DebounceState};
use crate::keymap::KeyMap;

/// A matrix keypad scanned one row at a time.
///
/// Geometry and key map are fixed at construction. Between scans every row
/// is inactive; during a scan exactly one row is active at any instant.
#[derive(Debug)]
pub struct KeypadMatrix<L, C> {
    lines: L,
    clock: C,
    keymap: KeyMap,
    settle: Duration,
    debounce: DebounceState,
}

impl<L: MatrixLines, C: Clock> KeypadMatrix<L, C> {
    /// Create a keypad over `lines`, leaving every row inactive.
    pub fn new(
        mut lines: L,
        clock: C,
        keymap: KeyMap,
        settle: Duration,
        debounce_window: Duration,
    ) -> Self {
        for row in 0..keymap.rows() {
            lines.set_row(row, false);
        }
        Self {
            lines,
            clock,
            keymap,
            settle,
            debounce: DebounceState::new(debounce_window),
        }
    }

    /// Create a keypad using the key map, settle time and debounce window
    /// from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured key map is malformed.
    pub fn from_config(lines: L, clock: C, config: &LockConfig) -> Result<Self> {
        let keymap = KeyMap::from_config(config)?;
        Ok(Self::new(
            lines,
            clock,
            keymap,
            config.key_settle(),
            config.debounce_window(),
        ))
    }

    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    /// Read the raw symbol under the first closed switch, row-major.
    ///
    /// Rows are returned to inactive before this returns, whether or not a
    /// key was found.
    pub fn scan(&mut self) -> Option<char> {
        let found = self.scan_rows();
        self.release_rows();
        found
    }

    /// Read the next new key press.
    ///
    /// Returns a symbol once per press; a held key reads as `None` until it
    /// has been released.
    pub fn get_key(&mut self) -> Option<char> {
        let scanned = self.scan();
        let outcome = self.debounce.observe(scanned, self.clock.now_ms());
        if let DebounceOutcome::NewPress(symbol) = outcome {
            trace!(%symbol, "key press");
        }
        outcome.new_press()
    }

    fn scan_rows(&mut self) -> Option<char> {
        for row in 0..self.keymap.rows() {
            self.drive_row(row);
            self.clock.delay(self.settle);

            for col in 0..self.keymap.cols() {
                if self.lines.column_active(col) {
                    return self.keymap.symbol(row, col);
                }
            }
        }
        None
    }

    /// Make `row` the only active row. Others go inactive first.
    fn drive_row(&mut self, row: usize) {
        for other in (0..self.keymap.rows()).filter(|&r| r != row) {
            self.lines.set_row(other, false);
        }
        self.lines.set_row(row, true);
    }

    fn release_rows(&mut self) {
        for row in 0..self.keymap.rows() {
            self.lines.set_row(row, false);
        }
    }
}

impl<L: MatrixLines, C: Clock> KeypadDevice for KeypadMatrix<L, C> {
    fn poll_key(&mut self) -> Option<KeypadInput> {
        let symbol = self.get_key()?;
        let input = KeypadInput::from_symbol(symbol);
        if input.is_none() {
            debug!(%symbol, "ignoring symbol with no keypad meaning");
        }
        input
    }

    fn info(&self) -> DeviceInfo {
        DeviceInfo::new(
            format!("{}x{} Matrix Keypad", self.keymap.rows(), self.keymap.cols()),
            "row-scanned membrane keypad",
        )
    }
}
