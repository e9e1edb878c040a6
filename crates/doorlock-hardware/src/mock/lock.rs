//! Simulated lock actuator.

use std::sync::{Arc, Mutex};

use doorlock_core::ActuatorKind;

use crate::{ActuatorOutput, HardwareError, Result, mock::lock_state, traits::LockActuator};

#[derive(Debug)]
struct LockState {
    kind: ActuatorKind,
    engaged: bool,
    writes: usize,
    failing: bool,
}

/// A [`LockActuator`] that tracks the output a real relay or servo would see.
///
/// ```
/// use doorlock_core::ActuatorKind;
/// use doorlock_hardware::ActuatorOutput;
/// use doorlock_hardware::mock::MockLock;
/// use doorlock_hardware::traits::LockActuator;
///
/// let (mut lock, handle) = MockLock::new(ActuatorKind::Servo);
/// lock.set_engaged(true).unwrap();
/// assert_eq!(handle.output(), ActuatorOutput::Servo { period_ms: 20, pulse_ms: 2 });
/// ```
#[derive(Debug)]
pub struct MockLock {
    state: Arc<Mutex<LockState>>,
}

impl MockLock {
    /// Create a closed lock of the given kind and its inspection handle.
    pub fn new(kind: ActuatorKind) -> (Self, MockLockHandle) {
        let state = Arc::new(Mutex::new(LockState {
            kind,
            engaged: false,
            writes: 0,
            failing: false,
        }));
        (
            Self {
                state: Arc::clone(&state),
            },
            MockLockHandle { state },
        )
    }
}

impl LockActuator for MockLock {
    fn set_engaged(&mut self, engaged: bool) -> Result<()> {
        let mut state = lock_state(&self.state);
        if state.failing {
            return Err(HardwareError::communication("lock driver not responding"));
        }
        state.engaged = engaged;
        state.writes += 1;
        Ok(())
    }

    fn is_engaged(&self) -> bool {
        lock_state(&self.state).engaged
    }
}

/// Inspection handle for a [`MockLock`].
#[derive(Debug, Clone)]
pub struct MockLockHandle {
    state: Arc<Mutex<LockState>>,
}

impl MockLockHandle {
    pub fn is_engaged(&self) -> bool {
        lock_state(&self.state).engaged
    }

    /// Output currently applied to the actuator.
    pub fn output(&self) -> ActuatorOutput {
        let state = lock_state(&self.state);
        ActuatorOutput::for_state(state.kind, state.engaged)
    }

    /// Number of successful writes, including redundant ones.
    pub fn writes(&self) -> usize {
        lock_state(&self.state).writes
    }

    /// Make subsequent writes fail.
    pub fn set_failing(&self, failing: bool) {
        lock_state(&self.state).failing = failing;
    }
}
