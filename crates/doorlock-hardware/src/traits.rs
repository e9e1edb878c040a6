//! Peripheral trait definitions.
//!
//! These traits are the contract between the access controller and the
//! hardware around it. The controller owns one implementation of each and
//! calls them from its single control loop.

use std::time::Duration;

use doorlock_core::KeypadInput;

use crate::error::Result;
use crate::types::DeviceInfo;

/// Row and column lines of a key matrix.
///
/// Rows are outputs, columns are inputs. "Active" is the logical level: a
/// pull-up matrix drives the active row low and reads a pressed key as a low
/// column, but that inversion belongs to the implementation.
pub trait MatrixLines {
    /// Drive one row line active or inactive.
    fn set_row(&mut self, row: usize, active: bool);

    /// Read one column line.
    ///
    /// Returns `true` if the column is active, which for a correctly scanned
    /// matrix means a key joins it to the currently active row.
    fn column_active(&mut self, col: usize) -> bool;
}

/// A source of debounced key events.
///
/// Polled once per control loop iteration; returns at most one new event.
///
/// # Examples
///
/// ```
/// use doorlock_core::KeypadInput;
/// use doorlock_hardware::traits::KeypadDevice;
///
/// fn read_digits<K: KeypadDevice>(keypad: &mut K, out: &mut String) {
///     while let Some(input) = keypad.poll_key() {
///         match input {
///             KeypadInput::Digit(d) => out.push(char::from(b'0' + d)),
///             KeypadInput::Star => out.clear(),
///             _ => break,
///         }
///     }
/// }
/// ```
pub trait KeypadDevice {
    /// Return the next new key press, if any.
    fn poll_key(&mut self) -> Option<KeypadInput>;

    /// Device metadata.
    fn info(&self) -> DeviceInfo;
}

/// Two-line status display.
pub trait DisplaySink {
    /// Replace the whole display content.
    ///
    /// Overwrites anything shown before; calling it again with the same text
    /// must be harmless.
    ///
    /// # Errors
    ///
    /// Returns an error if the display cannot be written.
    fn show_status(&mut self, line1: &str, line2: &str) -> Result<()>;
}

/// Door lock actuator.
pub trait LockActuator {
    /// `true` opens (energizes) the lock, `false` closes it.
    ///
    /// Must be safe to call redundantly.
    ///
    /// # Errors
    ///
    /// Returns an error if the actuator cannot be driven.
    fn set_engaged(&mut self, engaged: bool) -> Result<()>;

    /// Last state successfully applied.
    fn is_engaged(&self) -> bool;
}

/// Status indicator (a single LED with an optional flashing ticker).
pub trait Indicator {
    /// Turn the indicator steadily on or off.
    ///
    /// # Errors
    ///
    /// Returns an error if the LED cannot be driven.
    fn set_solid(&mut self, on: bool) -> Result<()>;

    /// Start flashing with the given full on/off period.
    ///
    /// Restarting with a different period replaces the previous ticker.
    ///
    /// # Errors
    ///
    /// Returns an error if no periodic ticker can be started.
    fn set_flashing(&mut self, period: Duration) -> Result<()>;

    /// Stop flashing, leaving the LED at its current level.
    ///
    /// # Errors
    ///
    /// Returns an error if the ticker cannot be stopped.
    fn stop_flashing(&mut self) -> Result<()>;
}

/// One LED output pin.
///
/// Shared between the main loop and the flashing ticker, so implementations
/// must be `Send`.
pub trait LedPin: Send + 'static {
    fn write(&mut self, on: bool);

    fn is_on(&self) -> bool;

    fn toggle(&mut self) {
        let on = self.is_on();
        self.write(!on);
    }
}

/// Monotonic time source.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin; never goes backwards.
    fn now_ms(&self) -> u64;

    /// Wait for a short, bounded interval (row settle time).
    fn delay(&self, duration: Duration);
}
