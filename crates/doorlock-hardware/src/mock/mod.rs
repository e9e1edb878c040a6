//! Mock peripherals for testing and simulation.
//!
//! Each mock comes with a cloneable handle (or is itself cloneable) so a test
//! can hand the device to the controller and still observe or drive it.

pub mod clock;
pub mod display;
pub mod indicator;
pub mod led;
pub mod lock;
pub mod matrix;

pub use clock::ManualClock;
pub use display::{MockDisplay, MockDisplayHandle};
pub use indicator::{MockIndicator, MockIndicatorHandle};
pub use led::MockLed;
pub use lock::{MockLock, MockLockHandle};
pub use matrix::{MockMatrix, MockMatrixHandle};

use std::sync::{Mutex, MutexGuard};

/// Lock a mock's shared state. Poisoning is ignored.
pub(crate) fn lock_state<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
