//! Peripheral abstraction layer for the door lock controller.
//!
//! The controller core never touches pins, buses or terminals directly. It
//! talks to its collaborators through the traits in [`traits`]:
//!
//! - [`MatrixLines`]: row outputs and column inputs of a key matrix
//! - [`KeypadDevice`]: a source of debounced [`KeypadInput`] events
//! - [`DisplaySink`]: a two-line status display
//! - [`LockActuator`]: the door strike or servo
//! - [`Indicator`] and [`LedPin`]: the status LED
//! - [`Clock`]: monotonic milliseconds plus short busy delays
//!
//! # Design
//!
//! - **Synchronous**: the controller runs a single cooperative loop, so every
//!   call is a plain method call that returns promptly.
//! - **Object-safe**: every trait can be used as `Box<dyn Trait>`.
//! - **Idempotent outputs**: `set_engaged`, `set_solid` and `show_status`
//!   must tolerate being called again with the same value.
//!
//! # Mock Implementations
//!
//! The [`mock`] module provides in-memory peripherals with inspection
//! handles, plus a [`ManualClock`](mock::ManualClock) for deterministic tests:
//!
//! ```
//! use doorlock_hardware::mock::MockLock;
//! use doorlock_hardware::traits::LockActuator;
//! use doorlock_core::ActuatorKind;
//!
//! let (mut lock, handle) = MockLock::new(ActuatorKind::Relay);
//! lock.set_engaged(true).unwrap();
//! assert!(handle.is_engaged());
//! ```
//!
//! [`KeypadInput`]: doorlock_core::KeypadInput

pub mod clock;
pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

pub use clock::SystemClock;
pub use error::{HardwareError, Result};
pub use traits::{Clock, DisplaySink, Indicator, KeypadDevice, LedPin, LockActuator, MatrixLines};
pub use types::{ActuatorOutput, DeviceInfo, IndicatorCommand};
