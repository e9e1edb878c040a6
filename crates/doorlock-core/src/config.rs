//! Controller configuration.
//!
//! All values are fixed when the controller is built; nothing here can be
//! changed while the control loop is running.
//!
//! ```
//! use doorlock_core::LockConfig;
//!
//! let config = LockConfig::builder()
//!     .credential("2468")
//!     .max_failed_attempts(5)
//!     .build()
//!     .unwrap();
//!
//! assert!(config.credential.matches("2468"));
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::{Credential, Error, Result, saturating_millis};

/// Lock actuator wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActuatorKind {
    /// Relay-driven strike: energized means open.
    #[default]
    Relay,

    /// Hobby servo driven by PWM.
    Servo,
}

/// Complete configuration of one door controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockConfig {
    /// Digits that open the door.
    pub credential: Credential,

    /// Input buffer capacity.
    pub max_password_length: usize,

    /// Wrong submissions before lockout.
    pub max_failed_attempts: u32,

    /// Key map rows, one string per row line.
    pub keymap: Vec<String>,

    /// Row settle delay in microseconds.
    pub key_settle_us: u32,

    pub debounce_ms: u64,
    pub open_duration_ms: u64,
    pub lockout_duration_ms: u64,
    pub flash_period_ms: u64,
    pub fast_flash_period_ms: u64,
    pub loop_period_ms: u64,
    pub notice_hold_ms: u64,

    /// Lock hardware variant.
    pub actuator: ActuatorKind,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            credential: Credential(DEFAULT_CREDENTIAL.to_string()),
            max_password_length: MAX_PASSWORD_LENGTH,
            max_failed_attempts: MAX_FAILED_ATTEMPTS,
            keymap: KEYPAD_LAYOUT
                .iter()
                .map(|row| row.iter().collect())
                .collect(),
            key_settle_us: KEY_SETTLE_US,
            debounce_ms: DEBOUNCE_MS,
            open_duration_ms: OPEN_DURATION_MS,
            lockout_duration_ms: LOCKOUT_DURATION_MS,
            flash_period_ms: FLASH_PERIOD_MS,
            fast_flash_period_ms: FAST_FLASH_PERIOD_MS,
            loop_period_ms: LOOP_PERIOD_MS,
            notice_hold_ms: NOTICE_HOLD_MS,
            actuator: ActuatorKind::Relay,
        }
    }
}

impl LockConfig {
    /// Create a builder starting from the build-time defaults.
    pub fn builder() -> LockConfigBuilder {
        LockConfigBuilder::default()
    }

    /// Check every precondition the controller relies on.
    ///
    /// # Errors
    /// Returns the first violated precondition.
    pub fn validate(&self) -> Result<()> {
        if self.max_password_length == 0 {
            return Err(Error::invalid_config(
                "max_password_length",
                "must be at least 1",
            ));
        }

        if self.credential.len() > self.max_password_length {
            return Err(Error::InvalidCredential(format!(
                "credential has {} digits, buffer holds at most {}",
                self.credential.len(),
                self.max_password_length
            )));
        }

        if self.max_failed_attempts == 0 {
            return Err(Error::invalid_config(
                "max_failed_attempts",
                "must be at least 1",
            ));
        }

        if self.keymap.is_empty() {
            return Err(Error::InvalidGeometry("keypad has no rows".to_string()));
        }

        let durations = [
            ("open_duration_ms", self.open_duration_ms),
            ("lockout_duration_ms", self.lockout_duration_ms),
            ("flash_period_ms", self.flash_period_ms),
            ("fast_flash_period_ms", self.fast_flash_period_ms),
            ("loop_period_ms", self.loop_period_ms),
        ];
        for (field, value) in durations {
            if value == 0 {
                return Err(Error::invalid_config(field, "must be greater than zero"));
            }
        }

        Ok(())
    }

    /// Key map rows as characters.
    pub fn keymap_rows(&self) -> Vec<Vec<char>> {
        self.keymap.iter().map(|row| row.chars().collect()).collect()
    }

    pub fn open_duration(&self) -> Duration {
        Duration::from_millis(self.open_duration_ms)
    }

    pub fn lockout_duration(&self) -> Duration {
        Duration::from_millis(self.lockout_duration_ms)
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn flash_period(&self) -> Duration {
        Duration::from_millis(self.flash_period_ms)
    }

    pub fn fast_flash_period(&self) -> Duration {
        Duration::from_millis(self.fast_flash_period_ms)
    }

    pub fn loop_period(&self) -> Duration {
        Duration::from_millis(self.loop_period_ms)
    }

    pub fn notice_hold(&self) -> Duration {
        Duration::from_millis(self.notice_hold_ms)
    }

    pub fn key_settle(&self) -> Duration {
        Duration::from_micros(u64::from(self.key_settle_us))
    }
}

/// Builder for [`LockConfig`].
#[derive(Debug, Default)]
pub struct LockConfigBuilder {
    config: LockConfig,
    credential: Option<String>,
}

impl LockConfigBuilder {
    /// Set the credential digits (validated in [`build`](Self::build)).
    pub fn credential(mut self, digits: impl Into<String>) -> Self {
        self.credential = Some(digits.into());
        self
    }

    pub fn max_password_length(mut self, length: usize) -> Self {
        self.config.max_password_length = length;
        self
    }

    pub fn max_failed_attempts(mut self, attempts: u32) -> Self {
        self.config.max_failed_attempts = attempts;
        self
    }

    /// Replace the key map, one string per row.
    pub fn keymap<I, S>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.keymap = rows.into_iter().map(Into::into).collect();
        self
    }

    pub fn debounce(mut self, window: Duration) -> Self {
        self.config.debounce_ms = saturating_millis(window);
        self
    }

    pub fn open_duration(mut self, duration: Duration) -> Self {
        self.config.open_duration_ms = saturating_millis(duration);
        self
    }

    pub fn lockout_duration(mut self, duration: Duration) -> Self {
        self.config.lockout_duration_ms = saturating_millis(duration);
        self
    }

    pub fn flash_period(mut self, period: Duration) -> Self {
        self.config.flash_period_ms = saturating_millis(period);
        self
    }

    pub fn loop_period(mut self, period: Duration) -> Self {
        self.config.loop_period_ms = saturating_millis(period);
        self
    }

    pub fn notice_hold(mut self, hold: Duration) -> Self {
        self.config.notice_hold_ms = saturating_millis(hold);
        self
    }

    pub fn actuator(mut self, kind: ActuatorKind) -> Self {
        self.config.actuator = kind;
        self
    }

    /// Validate and return the configuration.
    ///
    /// # Errors
    /// Returns an error if the credential or any other field is invalid.
    pub fn build(mut self) -> Result<LockConfig> {
        if let Some(digits) = self.credential.take() {
            self.config.credential =
                Credential::with_max_length(digits, self.config.max_password_length)?;
        }
        self.config.validate()?;
        Ok(self.config)
    }
}
