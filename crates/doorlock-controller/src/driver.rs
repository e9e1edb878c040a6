//! Fixed-period control loop.

use std::time::Duration;

use doorlock_core::saturating_millis;
use doorlock_hardware::{Clock, DisplaySink, Indicator, KeypadDevice, LockActuator};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::controller::AccessController;
use crate::state::StateTransition;

/// Couples a keypad to a controller and runs them at the loop period.
pub struct Driver<K, D, L, I, C> {
    keypad: K,
    controller: AccessController<D, L, I, C>,
    period: Duration,
}

impl<K, D, L, I, C> Driver<K, D, L, I, C>
where
    K: KeypadDevice,
    D: DisplaySink,
    L: LockActuator,
    I: Indicator,
    C: Clock,
{
    pub fn new(keypad: K, controller: AccessController<D, L, I, C>) -> Self {
        let period = controller.config().loop_period();
        Self {
            keypad,
            controller,
            period,
        }
    }

    /// One iteration: poll the keypad for at most one key and tick the
    /// controller with it.
    pub fn step(&mut self) -> Option<StateTransition> {
        let key = self.keypad.poll_key();
        if let Some(key) = key {
            debug!(%key, "key pressed");
        }
        self.controller.tick(key)
    }

    /// Run [`step`](Self::step) once per loop period. Never returns.
    ///
    /// Ticks missed under load are delayed rather than bunched up.
    pub async fn run(mut self) {
        let info = self.keypad.info();
        info!(
            keypad = %info.name,
            period_ms = saturating_millis(self.period),
            "control loop started"
        );

        self.controller.start();
        let mut interval = time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            self.step();
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn keypad(&self) -> &K {
        &self.keypad
    }

    pub fn controller(&self) -> &AccessController<D, L, I, C> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut AccessController<D, L, I, C> {
        &mut self.controller
    }
}
