//! The access-control state machine.
//!
//! [`AccessController`] owns the password buffer, the failed-attempt
//! counter and the two deadlines, and is the only writer of the
//! [`DoorFlag`]. It is driven from one loop: [`AccessController::tick`]
//! checks the deadlines first and then handles at most one key.
//!
//! Rejected input (full buffer, empty submit, wrong password) is a policy
//! outcome shown on the display, never an error. Peripheral failures are
//! logged and the state machine carries on.

use std::time::Duration;

use doorlock_core::{Deadline, KeypadInput, LockConfig, Result, saturating_millis};
use doorlock_hardware::{Clock, DisplaySink, Indicator, LockActuator};
use tracing::{debug, info, warn};

use crate::indicator::DoorFlag;
use crate::screens::Screen;
use crate::special_keys::{self, ControllerView, Mutation};
use crate::state::{DoorState, StateTransition, TransitionLog};

/// The collaborators a controller drives.
#[derive(Debug)]
pub struct Peripherals<D, L, I, C> {
    pub display: D,
    pub lock: L,
    pub indicator: I,
    pub clock: C,
}

/// Door lock access controller.
///
/// # Examples
///
/// ```
/// use doorlock_controller::{AccessController, DoorState, Peripherals};
/// use doorlock_core::{ActuatorKind, KeypadInput, LockConfig};
/// use doorlock_hardware::mock::{ManualClock, MockDisplay, MockIndicator, MockLock};
///
/// let (display, _screen) = MockDisplay::new();
/// let (lock, lock_handle) = MockLock::new(ActuatorKind::Relay);
/// let (indicator, _led) = MockIndicator::new();
/// let clock = ManualClock::new();
///
/// let mut controller = AccessController::new(
///     LockConfig::default(),
///     Peripherals { display, lock, indicator, clock },
/// )
/// .unwrap();
/// controller.start();
///
/// for key in "1234#".chars().filter_map(KeypadInput::from_symbol) {
///     controller.tick(Some(key));
/// }
/// assert_eq!(controller.state(), DoorState::DoorOpen);
/// assert!(lock_handle.is_engaged());
/// ```
pub struct AccessController<D, L, I, C> {
    config: LockConfig,
    peripherals: Peripherals<D, L, I, C>,
    door_flag: DoorFlag,
    state: DoorState,
    buffer: String,
    failed_attempts: u32,
    door_deadline: Option<Deadline>,
    lockout_deadline: Option<Deadline>,

    /// While set and unexpired, regular status screens are held back.
    notice: Option<Deadline>,
    fast_flash: bool,
    history: TransitionLog,
}

impl<D, L, I, C> AccessController<D, L, I, C>
where
    D: DisplaySink,
    L: LockActuator,
    I: Indicator,
    C: Clock,
{
    /// Build a controller in `EnteringPassword` with an empty buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(config: LockConfig, peripherals: Peripherals<D, L, I, C>) -> Result<Self> {
        Self::with_door_flag(config, peripherals, DoorFlag::new())
    }

    /// Like [`new`](Self::new), writing door state into an existing flag
    /// (the one a [`FlashingIndicator`](crate::FlashingIndicator) reads).
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn with_door_flag(
        config: LockConfig,
        peripherals: Peripherals<D, L, I, C>,
        door_flag: DoorFlag,
    ) -> Result<Self> {
        config.validate()?;
        door_flag.set_open(false);

        Ok(Self {
            buffer: String::with_capacity(config.max_password_length),
            config,
            peripherals,
            door_flag,
            state: DoorState::EnteringPassword,
            failed_attempts: 0,
            door_deadline: None,
            lockout_deadline: None,
            notice: None,
            fast_flash: false,
            history: TransitionLog::new(),
        })
    }

    /// Boot sequence: banner, lock closed, indicator solid, ready notice.
    ///
    /// The entry prompt follows once the notice hold has passed.
    pub fn start(&mut self) {
        self.show(&Screen::booting());
        self.secure_door();
        info!(
            actuator = ?self.config.actuator,
            max_attempts = self.config.max_failed_attempts,
            "door lock ready"
        );
        self.show_notice(Screen::ready());
    }

    /// One loop iteration: deadlines first, then the countdown refresh, then
    /// at most one key.
    ///
    /// A key arriving on the same tick as a timed transition is dropped.
    /// Returns the transition taken this tick, if any.
    pub fn tick(&mut self, key: Option<KeypadInput>) -> Option<StateTransition> {
        if let Some(transition) = self.poll_timers() {
            if let Some(key) = key {
                debug!(%key, "key dropped on timed transition");
            }
            return Some(transition);
        }

        self.refresh_display();
        key.and_then(|key| self.handle_key(key))
    }

    /// Check the door and lockout deadlines.
    ///
    /// Level-triggered: the check runs every call and the closing side
    /// effects are safe to repeat.
    pub fn poll_timers(&mut self) -> Option<StateTransition> {
        let now = self.now_ms();
        match self.state {
            DoorState::DoorOpen => {
                if self.door_deadline.is_none_or(|d| d.expired(now)) {
                    return Some(self.close_door());
                }
            }
            DoorState::LockedOut => {
                if self.lockout_deadline.is_none_or(|d| d.expired(now)) {
                    return Some(self.end_lockout());
                }
            }
            DoorState::EnteringPassword => {}
        }
        None
    }

    /// Redraw the status screen when a notice has expired, and refresh the
    /// countdown while a deadline is running.
    pub fn refresh_display(&mut self) {
        if let Some(notice) = self.notice {
            if !notice.expired(self.now_ms()) {
                return;
            }
            self.render_status();
            return;
        }

        if self.state.is_timed() {
            self.render_status();
        }
    }

    /// Act on one debounced key press.
    pub fn handle_key(&mut self, key: KeypadInput) -> Option<StateTransition> {
        match self.state {
            DoorState::DoorOpen => {
                debug!(%key, "key ignored while door is open");
                None
            }
            DoorState::LockedOut => {
                debug!(%key, "key ignored during lockout");
                self.render_status();
                None
            }
            DoorState::EnteringPassword => self.handle_entry_key(key),
        }
    }

    fn handle_entry_key(&mut self, key: KeypadInput) -> Option<StateTransition> {
        match key {
            KeypadInput::Digit(digit) => {
                if self.buffer.len() >= self.config.max_password_length {
                    debug!(len = self.buffer.len(), "buffer full, digit ignored");
                    return None;
                }
                self.buffer.push(char::from(b'0' + digit));
                debug!(len = self.buffer.len(), "digit entered");
                self.render_status();
                None
            }
            KeypadInput::Star => {
                if self.buffer.is_empty() {
                    debug!("nothing to clear");
                    self.show_notice(Screen::nothing_to_clear());
                } else {
                    debug!("buffer cleared");
                    self.buffer.clear();
                    self.render_status();
                }
                None
            }
            KeypadInput::Hash => {
                if self.buffer.is_empty() {
                    debug!("empty submit");
                    self.show_notice(Screen::enter_password_first());
                    return None;
                }
                self.submit()
            }
            KeypadInput::Letter(letter) => {
                self.dispatch_special(letter);
                None
            }
        }
    }

    fn submit(&mut self) -> Option<StateTransition> {
        let entered = std::mem::take(&mut self.buffer);
        if self.config.credential.matches(&entered) {
            info!(
                previous_failures = self.failed_attempts,
                "access granted"
            );
            self.failed_attempts = 0;
            let transition = self.open_door();
            self.show_notice(Screen::access_granted());
            return Some(transition);
        }

        self.failed_attempts = self.failed_attempts.saturating_add(1);
        let max = self.config.max_failed_attempts;
        warn!(attempts = self.failed_attempts, max, "wrong password");

        if self.failed_attempts >= max {
            let transition = self.begin_lockout();
            self.show_notice(Screen::too_many_tries(
                self.config.lockout_duration().as_secs(),
            ));
            return Some(transition);
        }

        self.show_notice(Screen::wrong_password(self.failed_attempts, max));
        None
    }

    fn dispatch_special(&mut self, letter: char) {
        let Some(handler) = special_keys::lookup(letter) else {
            debug!(%letter, "unbound letter key");
            return;
        };

        let outcome = handler(&self.view());
        if let Some(mutation) = outcome.mutation {
            self.apply(mutation);
        }
        self.show_notice(outcome.screen);
    }

    fn apply(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::ToggleFlashRate => {
                self.fast_flash = !self.fast_flash;
                info!(
                    period_ms = saturating_millis(self.flash_period()),
                    "flash rate changed"
                );
            }
            Mutation::ResetFailedAttempts => {
                info!(cleared = self.failed_attempts, "failed attempts reset");
                self.failed_attempts = 0;
            }
        }
    }

    fn open_door(&mut self) -> StateTransition {
        let now = self.now_ms();
        self.door_flag.set_open(true);
        report(self.peripherals.lock.set_engaged(true), "lock");
        self.door_deadline = Some(Deadline::arm(now, self.config.open_duration()));
        let period = self.flash_period();
        report(self.peripherals.indicator.set_flashing(period), "indicator");

        info!(
            open_ms = self.config.open_duration_ms,
            "door opened"
        );
        self.transition(DoorState::DoorOpen)
    }

    fn close_door(&mut self) -> StateTransition {
        self.door_deadline = None;
        self.secure_door();
        info!("door closed");
        let transition = self.transition(DoorState::EnteringPassword);
        self.render_status();
        transition
    }

    fn begin_lockout(&mut self) -> StateTransition {
        let now = self.now_ms();
        self.lockout_deadline = Some(Deadline::arm(now, self.config.lockout_duration()));
        warn!(
            attempts = self.failed_attempts,
            lockout_ms = self.config.lockout_duration_ms,
            "too many failed attempts, locked out"
        );
        self.transition(DoorState::LockedOut)
    }

    fn end_lockout(&mut self) -> StateTransition {
        self.lockout_deadline = None;
        self.failed_attempts = 0;
        self.buffer.clear();
        info!("lockout expired");
        let transition = self.transition(DoorState::EnteringPassword);
        self.render_status();
        transition
    }

    /// Lock closed, flag cleared, indicator steady on. Safe to repeat.
    fn secure_door(&mut self) {
        self.door_flag.set_open(false);
        report(self.peripherals.lock.set_engaged(false), "lock");
        report(self.peripherals.indicator.stop_flashing(), "indicator");
        report(self.peripherals.indicator.set_solid(true), "indicator");
    }

    fn transition(&mut self, to: DoorState) -> StateTransition {
        debug_assert!(
            self.state.can_transition_to(&to),
            "invalid transition {} -> {}",
            self.state,
            to
        );
        let transition = StateTransition::new(self.state, to, self.now_ms());
        info!(from = %transition.from, to = %transition.to, "state transition");
        self.state = to;
        self.history.push(transition);
        transition
    }

    fn status_screen(&self) -> Screen {
        let now = self.now_ms();
        match self.state {
            DoorState::EnteringPassword => Screen::enter_password(self.buffer.len()),
            DoorState::DoorOpen => Screen::door_open(
                self.door_deadline.map_or(0, |d| d.remaining_secs(now)),
            ),
            DoorState::LockedOut => Screen::locked_out(
                self.lockout_deadline.map_or(0, |d| d.remaining_secs(now)),
            ),
        }
    }

    fn render_status(&mut self) {
        self.notice = None;
        let screen = self.status_screen();
        self.show(&screen);
    }

    fn show_notice(&mut self, screen: Screen) {
        self.show(&screen);
        self.notice = Some(Deadline::arm(self.now_ms(), self.config.notice_hold()));
    }

    fn show(&mut self, screen: &Screen) {
        report(
            self.peripherals
                .display
                .show_status(&screen.line1, &screen.line2),
            "display",
        );
    }

    fn view(&self) -> ControllerView {
        ControllerView {
            state: self.state,
            failed_attempts: self.failed_attempts,
            max_failed_attempts: self.config.max_failed_attempts,
            fast_flash: self.fast_flash,
            door_remaining_secs: self.door_remaining().map(|d| d.as_secs()),
            lockout_remaining_secs: self.lockout_remaining().map(|d| d.as_secs()),
        }
    }

    fn now_ms(&self) -> u64 {
        self.peripherals.clock.now_ms()
    }

    pub fn state(&self) -> DoorState {
        self.state
    }

    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    pub fn is_door_open(&self) -> bool {
        self.state == DoorState::DoorOpen
    }

    pub fn is_locked_out(&self) -> bool {
        self.state == DoorState::LockedOut
    }

    /// Whether openings flash at the fast period.
    pub fn fast_flash(&self) -> bool {
        self.fast_flash
    }

    /// Flash period the next opening will use.
    pub fn flash_period(&self) -> Duration {
        if self.fast_flash {
            self.config.fast_flash_period()
        } else {
            self.config.flash_period()
        }
    }

    /// Time until the door closes, while open.
    pub fn door_remaining(&self) -> Option<Duration> {
        let now = self.now_ms();
        self.door_deadline
            .filter(|_| self.is_door_open())
            .map(|d| d.remaining(now))
    }

    /// Time until the lockout ends, while locked out.
    pub fn lockout_remaining(&self) -> Option<Duration> {
        let now = self.now_ms();
        self.lockout_deadline
            .filter(|_| self.is_locked_out())
            .map(|d| d.remaining(now))
    }

    /// A reader handle on the door-open flag.
    pub fn door_flag(&self) -> DoorFlag {
        self.door_flag.clone()
    }

    /// Recent transitions, oldest first.
    pub fn history(&self) -> &TransitionLog {
        &self.history
    }

    pub fn config(&self) -> &LockConfig {
        &self.config
    }

    pub fn peripherals(&self) -> &Peripherals<D, L, I, C> {
        &self.peripherals
    }
}

fn report(result: doorlock_hardware::Result<()>, peripheral: &'static str) {
    if let Err(error) = result {
        warn!(peripheral, %error, "peripheral command failed");
    }
}
