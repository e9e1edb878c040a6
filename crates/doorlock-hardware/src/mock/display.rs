//! Recording display.

use std::sync::{Arc, Mutex};

use crate::{HardwareError, Result, mock::lock_state, traits::DisplaySink};

#[derive(Debug, Default)]
struct DisplayState {
    frames: Vec<(String, String)>,
    failing: bool,
}

/// A [`DisplaySink`] that records every frame it is asked to show.
#[derive(Debug)]
pub struct MockDisplay {
    state: Arc<Mutex<DisplayState>>,
}

impl MockDisplay {
    /// Create a display and a handle for inspecting it.
    pub fn new() -> (Self, MockDisplayHandle) {
        let state = Arc::new(Mutex::new(DisplayState::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            MockDisplayHandle { state },
        )
    }
}

impl DisplaySink for MockDisplay {
    fn show_status(&mut self, line1: &str, line2: &str) -> Result<()> {
        let mut state = lock_state(&self.state);
        if state.failing {
            return Err(HardwareError::disconnected("Mock display"));
        }
        state.frames.push((line1.to_string(), line2.to_string()));
        Ok(())
    }
}

/// Inspection handle for a [`MockDisplay`].
#[derive(Debug, Clone)]
pub struct MockDisplayHandle {
    state: Arc<Mutex<DisplayState>>,
}

impl MockDisplayHandle {
    /// The frame currently on screen.
    pub fn current(&self) -> Option<(String, String)> {
        lock_state(&self.state).frames.last().cloned()
    }

    /// First line of the current frame, or an empty string.
    pub fn line1(&self) -> String {
        self.current().map(|(l1, _)| l1).unwrap_or_default()
    }

    /// Second line of the current frame, or an empty string.
    pub fn line2(&self) -> String {
        self.current().map(|(_, l2)| l2).unwrap_or_default()
    }

    /// Every frame shown so far, oldest first.
    pub fn frames(&self) -> Vec<(String, String)> {
        lock_state(&self.state).frames.clone()
    }

    pub fn frame_count(&self) -> usize {
        lock_state(&self.state).frames.len()
    }

    /// Check whether any frame had `text` as its first line.
    pub fn has_shown(&self, text: &str) -> bool {
        lock_state(&self.state)
            .frames
            .iter()
            .any(|(l1, _)| l1 == text)
    }

    pub fn clear_frames(&self) {
        lock_state(&self.state).frames.clear();
    }

    /// Make subsequent writes fail.
    pub fn set_failing(&self, failing: bool) {
        lock_state(&self.state).failing = failing;
    }
}
