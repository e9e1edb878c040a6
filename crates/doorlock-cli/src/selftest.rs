//! Scripted peripheral checks with PASS/FAIL reporting.

use std::time::Duration;

use anyhow::{Result, bail, ensure};
use doorlock_controller::{
    AccessController, DoorFlag, DoorState, FlashingIndicator, Peripherals, VirtualDisplay,
};
use doorlock_core::{ActuatorKind, KeypadInput, LockConfig};
use doorlock_hardware::mock::{
    ManualClock, MockDisplay, MockIndicator, MockLed, MockLock, MockMatrix,
};
use doorlock_hardware::{ActuatorOutput, DisplaySink, Indicator, LedPin, LockActuator};
use doorlock_keypad::{KeyMap, KeypadMatrix};
use tracing::info;

struct CheckResult {
    name: &'static str,
    outcome: Result<()>,
}

pub async fn run(config: &LockConfig) -> Result<()> {
    let results = vec![
        CheckResult {
            name: "display write",
            outcome: check_display(),
        },
        CheckResult {
            name: "led solid",
            outcome: check_led_solid(),
        },
        CheckResult {
            name: "led flashing",
            outcome: check_led_flashing(config).await,
        },
        CheckResult {
            name: "lock engage/release",
            outcome: check_lock(config.actuator),
        },
        CheckResult {
            name: "keypad scan",
            outcome: check_keypad(config),
        },
        CheckResult {
            name: "access flow",
            outcome: check_access_flow(config),
        },
    ];

    let mut failed = 0;
    for result in &results {
        match &result.outcome {
            Ok(()) => println!("PASS  {}", result.name),
            Err(error) => {
                failed += 1;
                println!("FAIL  {}: {error:#}", result.name);
            }
        }
    }
    println!("{} passed, {} failed", results.len() - failed, failed);
    info!(passed = results.len() - failed, failed, "self-test finished");

    if failed > 0 {
        bail!("{failed} self-test check(s) failed");
    }
    Ok(())
}

fn check_display() -> Result<()> {
    let mut display = VirtualDisplay::lcd_16x2();
    display.show_status("Door Lock v1.0", "Self Test")?;
    ensure!(
        display.line(0).map(str::trim_end) == Some("Door Lock v1.0"),
        "line 1 not written"
    );
    ensure!(
        display.line(1).map(str::trim_end) == Some("Self Test"),
        "line 2 not written"
    );
    Ok(())
}

fn check_led_solid() -> Result<()> {
    let led = MockLed::new();
    let mut indicator = FlashingIndicator::new(led.clone(), DoorFlag::new());

    indicator.set_solid(true)?;
    ensure!(led.is_on(), "LED did not turn on");
    indicator.set_solid(false)?;
    ensure!(!led.is_on(), "LED did not turn off");
    Ok(())
}

/// Drives a real controller open so the flash ticker sees the door flag.
async fn check_led_flashing(config: &LockConfig) -> Result<()> {
    let led = MockLed::new();
    let door_flag = DoorFlag::new();
    let (display, _) = MockDisplay::new();
    let (lock, _) = MockLock::new(config.actuator);
    let clock = ManualClock::new();
    let mut controller = AccessController::with_door_flag(
        LockConfig::builder().credential("1").build()?,
        Peripherals {
            display,
            lock,
            indicator: FlashingIndicator::new(led.clone(), door_flag.clone()),
            clock: clock.clone(),
        },
        door_flag,
    )?;

    controller.start();
    for key in "1#".chars().filter_map(KeypadInput::from_symbol) {
        controller.tick(Some(key));
    }
    ensure!(controller.is_door_open(), "controller did not open");

    let period = controller.flash_period();
    tokio::time::sleep(period * 2 + period / 4).await;
    let toggles = led.transitions();
    ensure!(toggles >= 3, "expected at least 3 toggles, saw {toggles}");

    clock.advance(controller.config().open_duration());
    controller.tick(None);
    ensure!(!controller.is_door_open(), "controller did not close");
    ensure!(led.is_on(), "LED not solid after closing");

    let settled = led.transitions();
    tokio::time::sleep(period).await;
    ensure!(led.transitions() == settled, "LED kept toggling after closing");
    Ok(())
}

fn check_lock(kind: ActuatorKind) -> Result<()> {
    let (mut lock, handle) = MockLock::new(kind);

    lock.set_engaged(true)?;
    ensure!(lock.is_engaged(), "lock did not open");
    ensure!(
        handle.output() == ActuatorOutput::for_state(kind, true),
        "unexpected open output {:?}",
        handle.output()
    );

    lock.set_engaged(false)?;
    lock.set_engaged(false)?;
    ensure!(!lock.is_engaged(), "lock did not close");
    ensure!(
        handle.output() == ActuatorOutput::for_state(kind, false),
        "unexpected closed output {:?}",
        handle.output()
    );
    Ok(())
}

fn check_keypad(config: &LockConfig) -> Result<()> {
    let keymap = KeyMap::from_config(config)?;
    let (lines, matrix) = MockMatrix::new(keymap.rows(), keymap.cols());
    let clock = ManualClock::new();
    let mut keypad = KeypadMatrix::from_config(lines, clock.clone(), config)?;

    for row in 0..keymap.rows() {
        for col in 0..keymap.cols() {
            let Some(expected) = keymap.symbol(row, col) else {
                bail!("no symbol at {row},{col}");
            };
            matrix.press(row, col);
            let reported = keypad.get_key();
            ensure!(
                reported == Some(expected),
                "key {row},{col}: expected {expected:?}, got {reported:?}"
            );
            ensure!(keypad.get_key().is_none(), "held key {expected:?} repeated");
            matrix.release(row, col);
            ensure!(keypad.get_key().is_none(), "released key {expected:?} reported");
            clock.advance(config.debounce_window());
        }
    }
    ensure!(
        matrix.max_rows_driven() <= 1,
        "more than one row driven during scan"
    );
    Ok(())
}

type MockController = AccessController<MockDisplay, MockLock, MockIndicator, ManualClock>;

fn press(controller: &mut MockController, keys: &str) {
    for key in keys.chars().filter_map(KeypadInput::from_symbol) {
        controller.tick(Some(key));
    }
}

fn check_access_flow(config: &LockConfig) -> Result<()> {
    let (display, screen) = MockDisplay::new();
    let (lock, lock_handle) = MockLock::new(config.actuator);
    let (indicator, _) = MockIndicator::new();
    let clock = ManualClock::new();
    let mut controller: MockController = AccessController::new(
        LockConfig::builder()
            .credential("1234")
            .actuator(config.actuator)
            .build()?,
        Peripherals {
            display,
            lock,
            indicator,
            clock: clock.clone(),
        },
    )?;
    controller.start();

    press(&mut controller, "1234#");
    ensure!(controller.state() == DoorState::DoorOpen, "correct code refused");
    ensure!(lock_handle.is_engaged(), "lock not opened");

    clock.advance(controller.config().open_duration());
    controller.tick(None);
    ensure!(
        controller.state() == DoorState::EnteringPassword,
        "door did not close"
    );

    for _ in 0..controller.config().max_failed_attempts {
        press(&mut controller, "0#");
    }
    ensure!(
        controller.state() == DoorState::LockedOut,
        "no lockout after repeated failures"
    );
    ensure!(screen.has_shown("TOO MANY TRIES!"), "lockout not displayed");

    clock.advance(controller.config().lockout_duration());
    controller.tick(None);
    ensure!(
        controller.state() == DoorState::EnteringPassword,
        "lockout did not expire"
    );
    Ok(())
}
