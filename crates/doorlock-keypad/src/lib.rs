//! Matrix keypad scanning with debouncing.
//!
//! [`KeypadMatrix`] turns the electrical state of a row/column key matrix into
//! at most one new key symbol per scan cycle:
//!
//! 1. [`scan`](KeypadMatrix::scan) drives each row in turn, waits a short
//!    settle time and reads the columns. The first active column wins.
//! 2. [`get_key`](KeypadMatrix::get_key) feeds the scan through a
//!    [`DebounceState`] so that one physical press is reported exactly once,
//!    however long it is held.
//!
//! ```
//! use doorlock_hardware::mock::{ManualClock, MockMatrix};
//! use doorlock_keypad::{KeyMap, KeypadMatrix};
//! use std::time::Duration;
//!
//! let (lines, handle) = MockMatrix::new(4, 4);
//! let mut keypad = KeypadMatrix::new(
//!     lines,
//!     ManualClock::new(),
//!     KeyMap::standard_4x4(),
//!     Duration::from_micros(10),
//!     Duration::from_millis(50),
//! );
//!
//! handle.press(0, 3);
//! assert_eq!(keypad.get_key(), Some('A'));
//! assert_eq!(keypad.get_key(), None); // still held
//! ```

pub mod debounce;
pub mod keymap;
pub mod matrix;

pub use debounce::{DebounceOutcome, DebounceState};
pub use keymap::KeyMap;
pub use matrix::KeypadMatrix;
