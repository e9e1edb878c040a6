//! Shared rig for controller integration tests.
//!
//! A [`Rig`] wires an [`AccessController`] to mock peripherals and a
//! [`ManualClock`], so every timeout is driven by advancing the clock
//! rather than sleeping.

#![allow(dead_code)]

use doorlock_controller::{AccessController, DoorState, Peripherals, StateTransition};
use doorlock_core::{ActuatorKind, KeypadInput, LockConfig};
use doorlock_hardware::mock::{
    ManualClock, MockDisplay, MockDisplayHandle, MockIndicator, MockIndicatorHandle, MockLock,
    MockLockHandle,
};

pub type MockController = AccessController<MockDisplay, MockLock, MockIndicator, ManualClock>;

/// Loop period used when stepping time in tests.
pub const LOOP_MS: u64 = 100;

pub struct Rig {
    pub controller: MockController,
    pub display: MockDisplayHandle,
    pub lock: MockLockHandle,
    pub indicator: MockIndicatorHandle,
    pub clock: ManualClock,
}

impl Rig {
    pub fn new(config: LockConfig) -> Self {
        let (display, display_handle) = MockDisplay::new();
        let (lock, lock_handle) = MockLock::new(config.actuator);
        let (indicator, indicator_handle) = MockIndicator::new();
        let clock = ManualClock::new();

        let controller = AccessController::new(
            config,
            Peripherals {
                display,
                lock,
                indicator,
                clock: clock.clone(),
            },
        )
        .expect("valid test config");

        Self {
            controller,
            display: display_handle,
            lock: lock_handle,
            indicator: indicator_handle,
            clock,
        }
    }

    /// Rig with default config, already past the boot notice.
    pub fn started() -> Self {
        let mut rig = Self::new(LockConfig::default());
        rig.controller.start();
        rig.run_for(2_000);
        rig
    }

    /// Feed one tick per symbol, returning every transition taken.
    pub fn type_keys(&mut self, keys: &str) -> Vec<StateTransition> {
        keys.chars()
            .filter_map(KeypadInput::from_symbol)
            .filter_map(|key| self.controller.tick(Some(key)))
            .collect()
    }

    /// Tick with no key every loop period for `ms` milliseconds.
    pub fn run_for(&mut self, ms: u64) -> Vec<StateTransition> {
        let mut transitions = Vec::new();
        let mut elapsed = 0;
        while elapsed < ms {
            let step = LOOP_MS.min(ms - elapsed);
            self.clock.advance_ms(step);
            elapsed += step;
            transitions.extend(self.controller.tick(None));
        }
        transitions
    }

    pub fn state(&self) -> DoorState {
        self.controller.state()
    }

    pub fn screen(&self) -> (String, String) {
        self.display.current().unwrap_or_default()
    }
}

pub fn relay_config() -> LockConfig {
    LockConfig::default()
}

pub fn servo_config() -> LockConfig {
    LockConfig::builder()
        .actuator(ActuatorKind::Servo)
        .build()
        .expect("valid servo config")
}

/// Submit a wrong password `times` times.
pub fn fail_times(rig: &mut Rig, times: usize) -> Vec<StateTransition> {
    (0..times).flat_map(|_| rig.type_keys("9999#")).collect()
}
