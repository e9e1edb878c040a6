//! Value types shared by peripheral implementations.

use std::time::Duration;

use doorlock_core::constants::{SERVO_CLOSED_PULSE_MS, SERVO_OPEN_PULSE_MS, SERVO_PERIOD_MS};
use doorlock_core::ActuatorKind;
use serde::{Deserialize, Serialize};

/// Generic device information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Device name (e.g., "4x4 Matrix Keypad").
    pub name: String,

    /// Device model identifier.
    pub model: String,
}

impl DeviceInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Electrical output of a lock actuator for a given engaged state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActuatorOutput {
    /// Relay coil level.
    Relay { energized: bool },

    /// Servo PWM signal.
    Servo { period_ms: u32, pulse_ms: u32 },
}

impl ActuatorOutput {
    /// Output that puts `kind` into the requested state.
    ///
    /// ```
    /// use doorlock_core::ActuatorKind;
    /// use doorlock_hardware::ActuatorOutput;
    ///
    /// assert_eq!(
    ///     ActuatorOutput::for_state(ActuatorKind::Servo, true),
    ///     ActuatorOutput::Servo { period_ms: 20, pulse_ms: 2 }
    /// );
    /// ```
    pub fn for_state(kind: ActuatorKind, engaged: bool) -> Self {
        match kind {
            ActuatorKind::Relay => Self::Relay { energized: engaged },
            ActuatorKind::Servo => Self::Servo {
                period_ms: SERVO_PERIOD_MS,
                pulse_ms: if engaged {
                    SERVO_OPEN_PULSE_MS
                } else {
                    SERVO_CLOSED_PULSE_MS
                },
            },
        }
    }
}

/// A command issued to a status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorCommand {
    Solid(bool),
    Flashing(Duration),
    StopFlashing,
}
