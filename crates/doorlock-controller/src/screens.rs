//! Text shown on the two-line status display.
//!
//! Every line fits a 16-column character LCD.

use doorlock_core::constants::FIRMWARE_BANNER;

/// One full display frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub line1: String,
    pub line2: String,
}

impl Screen {
    pub fn new(line1: impl Into<String>, line2: impl Into<String>) -> Self {
        Self {
            line1: line1.into(),
            line2: line2.into(),
        }
    }

    pub fn booting() -> Self {
        Self::new(FIRMWARE_BANNER, "Initializing...")
    }

    pub fn ready() -> Self {
        Self::new("System Ready!", "")
    }

    /// Entry prompt with one `*` per typed digit.
    pub fn enter_password(typed: usize) -> Self {
        Self::new("Enter Password:", "*".repeat(typed))
    }

    pub fn door_open(remaining_secs: u64) -> Self {
        Self::new("Door Open", format!("Closing in {remaining_secs}s"))
    }

    pub fn locked_out(remaining_secs: u64) -> Self {
        Self::new("LOCKED OUT!", format!("Wait {remaining_secs}s"))
    }

    pub fn access_granted() -> Self {
        Self::new("Access Granted!", "Door Opening...")
    }

    pub fn wrong_password(attempts: u32, max_attempts: u32) -> Self {
        Self::new(
            "Wrong Password!",
            format!("Attempts: {attempts}/{max_attempts}"),
        )
    }

    pub fn too_many_tries(lockout_secs: u64) -> Self {
        Self::new("TOO MANY TRIES!", format!("Locked {lockout_secs}s"))
    }

    pub fn enter_password_first() -> Self {
        Self::new("Enter Password", "First!")
    }

    pub fn nothing_to_clear() -> Self {
        Self::new("Nothing to Clear", "")
    }
}
