//! Recording indicator.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::{IndicatorCommand, Result, mock::lock_state, traits::Indicator};

#[derive(Debug, Default)]
struct IndicatorState {
    commands: Vec<IndicatorCommand>,
    solid: bool,
    flashing: Option<Duration>,
}

/// An [`Indicator`] that records commands instead of driving an LED.
#[derive(Debug)]
pub struct MockIndicator {
    state: Arc<Mutex<IndicatorState>>,
}

impl MockIndicator {
    pub fn new() -> (Self, MockIndicatorHandle) {
        let state = Arc::new(Mutex::new(IndicatorState::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            MockIndicatorHandle { state },
        )
    }
}

impl Indicator for MockIndicator {
    fn set_solid(&mut self, on: bool) -> Result<()> {
        let mut state = lock_state(&self.state);
        state.solid = on;
        state.commands.push(IndicatorCommand::Solid(on));
        Ok(())
    }

    fn set_flashing(&mut self, period: Duration) -> Result<()> {
        let mut state = lock_state(&self.state);
        state.flashing = Some(period);
        state.commands.push(IndicatorCommand::Flashing(period));
        Ok(())
    }

    fn stop_flashing(&mut self) -> Result<()> {
        let mut state = lock_state(&self.state);
        state.flashing = None;
        state.commands.push(IndicatorCommand::StopFlashing);
        Ok(())
    }
}

/// Inspection handle for a [`MockIndicator`].
#[derive(Debug, Clone)]
pub struct MockIndicatorHandle {
    state: Arc<Mutex<IndicatorState>>,
}

impl MockIndicatorHandle {
    /// Current flash period, if flashing.
    pub fn flashing(&self) -> Option<Duration> {
        lock_state(&self.state).flashing
    }

    pub fn is_solid_on(&self) -> bool {
        let state = lock_state(&self.state);
        state.flashing.is_none() && state.solid
    }

    pub fn commands(&self) -> Vec<IndicatorCommand> {
        lock_state(&self.state).commands.clone()
    }

    pub fn last_command(&self) -> Option<IndicatorCommand> {
        lock_state(&self.state).commands.last().copied()
    }
}
