use crate::{Result, constants::MAX_PASSWORD_LENGTH, error::Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use subtle::ConstantTimeEq;

/// A debounced key event from the keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeypadInput {
    /// Numeric digit (0-9).
    Digit(u8),

    /// Star key (`*`), clears the input buffer.
    Star,

    /// Hash key (`#`), submits the input buffer.
    Hash,

    /// Letter key (`A`-`D`), routed to the special-key handlers.
    Letter(char),
}

impl KeypadInput {
    /// Map a raw key-map symbol to an input.
    ///
    /// Returns `None` for the null symbol and for anything that is not on a
    /// standard access keypad.
    ///
    /// ```
    /// use doorlock_core::KeypadInput;
    ///
    /// assert_eq!(KeypadInput::from_symbol('7'), Some(KeypadInput::Digit(7)));
    /// assert_eq!(KeypadInput::from_symbol('#'), Some(KeypadInput::Hash));
    /// assert_eq!(KeypadInput::from_symbol('E'), None);
    /// ```
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '0'..='9' => symbol.to_digit(10).map(|d| Self::Digit(d as u8)),
            '*' => Some(Self::Star),
            '#' => Some(Self::Hash),
            'A'..='D' => Some(Self::Letter(symbol)),
            _ => None,
        }
    }

    /// The key-map symbol for this input.
    pub fn symbol(&self) -> char {
        match self {
            Self::Digit(d) => char::from(b'0' + d),
            Self::Star => '*',
            Self::Hash => '#',
            Self::Letter(c) => *c,
        }
    }

}

impl fmt::Display for KeypadInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// The reference digit string the input buffer is compared against.
///
/// Comparison is exact equality over the plaintext digits, evaluated in
/// constant time. The `Debug` output never shows the digits.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Credential(pub(crate) String);

impl Credential {
    /// Create a credential, validating it against the default maximum
    /// password length.
    ///
    /// # Errors
    /// Returns `Error::InvalidCredential` if the string is empty, contains
    /// anything other than ASCII digits, or is longer than
    /// [`MAX_PASSWORD_LENGTH`].
    pub fn new(digits: impl Into<String>) -> Result<Self> {
        Self::with_max_length(digits, MAX_PASSWORD_LENGTH)
    }

    /// Create a credential that must fit in a buffer of `max_length` digits.
    pub fn with_max_length(digits: impl Into<String>, max_length: usize) -> Result<Self> {
        let credential = Self::parse(digits.into())?;
        if credential.len() > max_length {
            return Err(Error::InvalidCredential(format!(
                "credential has {} digits, buffer holds at most {max_length}",
                credential.len()
            )));
        }
        Ok(credential)
    }

    /// Digit and emptiness checks only; the length bound belongs to the
    /// buffer it is used with.
    fn parse(digits: String) -> Result<Self> {
        if digits.is_empty() {
            return Err(Error::InvalidCredential(
                "credential must not be empty".to_string(),
            ));
        }

        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidCredential(
                "credential must contain only digits 0-9".to_string(),
            ));
        }

        Ok(Credential(digits))
    }

    /// Check typed digits against the credential.
    #[must_use]
    pub fn matches(&self, entered: &str) -> bool {
        self.0.as_bytes().ct_eq(entered.as_bytes()).into()
    }

    /// Number of digits in the credential.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(<{} digits>)", self.0.len())
    }
}

impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.0)
    }
}

impl Eq for Credential {}

impl TryFrom<String> for Credential {
    type Error = Error;

    /// Length is not bounded here: a deserialized [`LockConfig`] checks it
    /// against its own `max_password_length` in `validate`.
    ///
    /// [`LockConfig`]: crate::LockConfig
    fn try_from(value: String) -> Result<Self> {
        Credential::parse(value)
    }
}

impl From<Credential> for String {
    fn from(value: Credential) -> Self {
        value.0
    }
}

impl std::str::FromStr for Credential {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Credential::new(s)
    }
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
pub fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// A resettable deadline measured on a monotonic millisecond clock.
///
/// Expiry is checked by polling; nothing fires on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadline {
    armed_at_ms: u64,
    duration_ms: u64,
}

impl Deadline {
    /// Arm a deadline `duration` after `now_ms`.
    pub fn arm(now_ms: u64, duration: Duration) -> Self {
        Self {
            armed_at_ms: now_ms,
            duration_ms: saturating_millis(duration),
        }
    }

    /// Milliseconds elapsed since arming.
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.armed_at_ms)
    }

    /// True once `now_ms` has reached the expiry time.
    pub fn expired(&self, now_ms: u64) -> bool {
        self.elapsed_ms(now_ms) >= self.duration_ms
    }

    /// Time left before expiry, zero once expired.
    pub fn remaining(&self, now_ms: u64) -> Duration {
        Duration::from_millis(self.duration_ms.saturating_sub(self.elapsed_ms(now_ms)))
    }

    /// Whole seconds left, rounded down.
    pub fn remaining_secs(&self, now_ms: u64) -> u64 {
        self.remaining(now_ms).as_secs()
    }
}
