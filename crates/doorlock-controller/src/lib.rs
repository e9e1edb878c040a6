//! Door lock access controller.
//!
//! This crate holds the policy half of the lock: the state machine that
//! turns debounced key presses into lock, indicator and display commands.
//!
//! # Modules
//!
//! - [`controller`]: [`AccessController`], the password/lockout state machine
//! - [`state`]: [`DoorState`] and the bounded transition history
//! - [`special_keys`]: dispatch table for the `A`..`D` letter keys
//! - [`screens`]: display texts
//! - [`display`]: [`VirtualDisplay`], an in-memory 16x2 character LCD
//! - [`indicator`]: [`DoorFlag`] and the tokio-driven [`FlashingIndicator`]
//! - [`driver`]: [`Driver`], the fixed-period control loop
//!
//! # Concurrency
//!
//! Everything runs on one control loop except the LED flash ticker, which
//! reads a single [`DoorFlag`] written only by the controller.

pub mod controller;
pub mod display;
pub mod driver;
pub mod indicator;
pub mod screens;
pub mod special_keys;
pub mod state;

pub use controller::{AccessController, Peripherals};
pub use display::VirtualDisplay;
pub use driver::Driver;
pub use indicator::{DoorFlag, FlashingIndicator};
pub use screens::Screen;
pub use state::{DoorState, StateTransition, TransitionLog, MAX_HISTORY_SIZE};
