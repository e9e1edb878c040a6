//! Build-time defaults for the door lock controller.
//!
//! These values describe the reference installation: a 4x4 membrane keypad,
//! a 16x2 character LCD, a relay-driven strike and a single status LED.
//! [`LockConfig::default`](crate::LockConfig::default) is built from them.
//!
//! ```
//! use doorlock_core::constants::*;
//!
//! assert_eq!(DEFAULT_CREDENTIAL, "1234");
//! assert!(DEFAULT_CREDENTIAL.len() <= MAX_PASSWORD_LENGTH);
//! ```

// ============================================================================
// Credentials
// ============================================================================

/// Reference credential compared against the typed digits.
pub const DEFAULT_CREDENTIAL: &str = "1234";

/// Maximum number of digits held in the input buffer.
pub const MAX_PASSWORD_LENGTH: usize = 8;

/// Consecutive wrong submissions that trigger a lockout.
pub const MAX_FAILED_ATTEMPTS: u32 = 3;

// ============================================================================
// Keypad
// ============================================================================

/// Number of row lines on the reference keypad.
pub const KEYPAD_ROWS: usize = 4;

/// Number of column lines on the reference keypad.
pub const KEYPAD_COLS: usize = 4;

/// Reference key layout, row-major.
pub const KEYPAD_LAYOUT: [[char; KEYPAD_COLS]; KEYPAD_ROWS] = [
    ['1', '2', '3', 'A'],
    ['4', '5', '6', 'B'],
    ['7', '8', '9', 'C'],
    ['*', '0', '#', 'D'],
];

/// Symbol meaning "no key pressed".
pub const NULL_SYMBOL: char = '\0';

/// Settle delay after driving a row, in microseconds.
pub const KEY_SETTLE_US: u32 = 10;

/// Debounce window in milliseconds.
pub const DEBOUNCE_MS: u64 = 50;

// ============================================================================
// Timing
// ============================================================================

/// How long the lock stays open after a successful entry.
pub const OPEN_DURATION_MS: u64 = 10_000;

/// How long the keypad stays locked after too many failures.
pub const LOCKOUT_DURATION_MS: u64 = 30_000;

/// Full on/off period of the door-open indicator (2 Hz).
pub const FLASH_PERIOD_MS: u64 = 500;

/// Full on/off period when fast flashing is selected with the `B` key.
pub const FAST_FLASH_PERIOD_MS: u64 = 200;

/// Driver loop period.
pub const LOOP_PERIOD_MS: u64 = 100;

/// How long a policy message stays on screen before the status screen returns.
pub const NOTICE_HOLD_MS: u64 = 2_000;

// ============================================================================
// Display
// ============================================================================

/// Character LCD line count.
pub const DISPLAY_LINES: usize = 2;

/// Character LCD column count.
pub const DISPLAY_COLUMNS: usize = 16;

/// Firmware banner shown at boot and by the `A` key.
pub const FIRMWARE_BANNER: &str = "Door Lock v1.0";

// ============================================================================
// Lock actuator
// ============================================================================

/// Servo PWM period.
pub const SERVO_PERIOD_MS: u32 = 20;

/// Servo pulse width for the open (90 degree) position.
pub const SERVO_OPEN_PULSE_MS: u32 = 2;

/// Servo pulse width for the closed (0 degree) position.
pub const SERVO_CLOSED_PULSE_MS: u32 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_matches_geometry() {
        assert_eq!(KEYPAD_LAYOUT.len(), KEYPAD_ROWS);
        assert!(KEYPAD_LAYOUT.iter().all(|row| row.len() == KEYPAD_COLS));
    }

    #[test]
    fn test_layout_has_control_keys() {
        let flat: Vec<char> = KEYPAD_LAYOUT.iter().flatten().copied().collect();
        for symbol in ['*', '#', 'A', 'B', 'C', 'D'] {
            assert!(flat.contains(&symbol), "missing {symbol}");
        }
        assert!(!flat.contains(&NULL_SYMBOL));
    }

    #[test]
    fn test_fast_flash_is_faster() {
        assert!(FAST_FLASH_PERIOD_MS < FLASH_PERIOD_MS);
    }
}
