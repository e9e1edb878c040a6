//! Door controller states and transition records.
//!
//! # States
//!
//! - `EnteringPassword`: collecting digits; the only state that reacts to keys
//! - `DoorOpen`: lock energized until the open deadline passes
//! - `LockedOut`: too many wrong submissions; keys only refresh the countdown
//!
//! # Valid Transitions
//!
//! - EnteringPassword → DoorOpen (correct credential)
//! - EnteringPassword → LockedOut (failure threshold reached)
//! - DoorOpen → EnteringPassword (open deadline passed)
//! - LockedOut → EnteringPassword (lockout deadline passed)

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of transitions kept for diagnostics.
pub const MAX_HISTORY_SIZE: usize = 32;

/// Operating mode of the access controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorState {
    /// Waiting for digits; the door is closed.
    EnteringPassword,

    /// Correct credential accepted; the lock is open.
    DoorOpen,

    /// Failure threshold reached; input is refused until the lockout ends.
    LockedOut,
}

impl fmt::Display for DoorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_str = match self {
            DoorState::EnteringPassword => "EnteringPassword",
            DoorState::DoorOpen => "DoorOpen",
            DoorState::LockedOut => "LockedOut",
        };
        write!(f, "{}", state_str)
    }
}

impl DoorState {
    /// Check if transition to target state is valid from this state.
    ///
    /// ```
    /// use doorlock_controller::DoorState;
    ///
    /// assert!(DoorState::EnteringPassword.can_transition_to(&DoorState::DoorOpen));
    /// assert!(!DoorState::DoorOpen.can_transition_to(&DoorState::LockedOut));
    /// ```
    pub fn can_transition_to(&self, target: &DoorState) -> bool {
        matches!(
            (self, target),
            (
                DoorState::EnteringPassword,
                DoorState::DoorOpen | DoorState::LockedOut
            ) | (DoorState::DoorOpen, DoorState::EnteringPassword)
                | (DoorState::LockedOut, DoorState::EnteringPassword)
        )
    }

    /// Whether this state runs on a deadline.
    pub fn is_timed(&self) -> bool {
        matches!(self, DoorState::DoorOpen | DoorState::LockedOut)
    }
}

/// A single state change, stamped with the controller clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransition {
    pub from: DoorState,
    pub to: DoorState,

    /// Clock reading (ms) when the transition happened.
    pub at_ms: u64,
}

impl StateTransition {
    pub fn new(from: DoorState, to: DoorState, at_ms: u64) -> Self {
        Self { from, to, at_ms }
    }
}

/// Bounded log of recent transitions, oldest first.
#[derive(Debug, Clone, Default)]
pub struct TransitionLog {
    entries: VecDeque<StateTransition>,
}

impl TransitionLog {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    pub fn push(&mut self, transition: StateTransition) {
        self.entries.push_back(transition);
        if self.entries.len() > MAX_HISTORY_SIZE {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&StateTransition> {
        self.entries.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StateTransition> {
        self.entries.iter()
    }
}
