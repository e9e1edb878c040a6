use thiserror::Error;

/// Construction-time precondition violations.
///
/// Runtime policy outcomes (wrong password, full buffer, lockout) are never
/// errors; they are reported on the display. Everything in this enum is
/// raised before the control loop starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("Invalid keypad geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    #[error("Invalid key symbol: {0:?}")]
    InvalidKeySymbol(char),
}

impl Error {
    /// Create a new configuration error for a named field.
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
