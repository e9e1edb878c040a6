//! End-to-end flows through the access controller.
//!
//! Credential "1234", max length 8, three attempts, 10 s open, 30 s lockout.

mod common;

use std::time::Duration;

use common::{Rig, fail_times, servo_config};
use doorlock_controller::DoorState;
use doorlock_hardware::{ActuatorOutput, IndicatorCommand};
use rstest::rstest;

#[test]
fn test_correct_code_opens_door() {
    let mut rig = Rig::started();

    let transitions = rig.type_keys("1234#");

    assert_eq!(transitions.len(), 1);
    assert_eq!(transitions[0].to, DoorState::DoorOpen);
    assert!(rig.lock.is_engaged());
    assert_eq!(rig.controller.failed_attempts(), 0);
    assert_eq!(rig.indicator.flashing(), Some(Duration::from_millis(500)));
}

#[test]
fn test_success_resets_prior_failures() {
    let mut rig = Rig::started();
    fail_times(&mut rig, 2);
    assert_eq!(rig.controller.failed_attempts(), 2);

    rig.type_keys("1234#");

    assert_eq!(rig.state(), DoorState::DoorOpen);
    assert_eq!(rig.controller.failed_attempts(), 0);
}

#[test]
fn test_three_failures_lock_out() {
    let mut rig = Rig::started();

    let transitions = fail_times(&mut rig, 3);

    assert_eq!(transitions.len(), 1);
    assert_eq!(transitions[0].to, DoorState::LockedOut);
    assert_eq!(rig.controller.failed_attempts(), 3);
    assert!(!rig.lock.is_engaged());
}

#[test]
fn test_lockout_holds_for_full_duration_despite_keys() {
    let mut rig = Rig::started();
    fail_times(&mut rig, 3);

    for _ in 0..29 {
        rig.run_for(1_000);
        rig.type_keys("1234#");
        assert_eq!(rig.state(), DoorState::LockedOut);
        assert_eq!(rig.controller.buffer_len(), 0);
    }

    let transitions = rig.run_for(1_000);
    assert_eq!(transitions.len(), 1);
    assert_eq!(rig.state(), DoorState::EnteringPassword);
    assert_eq!(rig.controller.failed_attempts(), 0);
    assert_eq!(rig.screen(), ("Enter Password:".to_string(), String::new()));

    rig.type_keys("1234#");
    assert_eq!(rig.state(), DoorState::DoorOpen);
}

#[test]
fn test_lockout_countdown_refreshes_every_loop() {
    let mut rig = Rig::started();
    fail_times(&mut rig, 3);

    rig.run_for(2_000);
    assert_eq!(rig.screen().1, "Wait 28s");
    rig.run_for(10_000);
    assert_eq!(rig.screen().1, "Wait 18s");
}

#[test]
fn test_keys_ignored_while_open() {
    let mut rig = Rig::started();
    rig.type_keys("1234#");
    let writes = rig.lock.writes();

    assert!(rig.type_keys("56*#ABCD").is_empty());

    assert_eq!(rig.state(), DoorState::DoorOpen);
    assert_eq!(rig.controller.buffer_len(), 0);
    assert_eq!(rig.lock.writes(), writes);
    assert!(!rig.controller.fast_flash());
}

#[test]
fn test_door_closes_after_open_duration() {
    let mut rig = Rig::started();
    rig.type_keys("1234#");

    rig.run_for(9_900);
    assert_eq!(rig.state(), DoorState::DoorOpen);
    assert_eq!(rig.screen(), ("Door Open".to_string(), "Closing in 0s".to_string()));

    let transitions = rig.run_for(100);
    assert_eq!(transitions.len(), 1);
    assert_eq!(rig.state(), DoorState::EnteringPassword);
    assert!(!rig.lock.is_engaged());
    assert!(rig.indicator.is_solid_on());
    assert_eq!(
        rig.indicator.commands().last_chunk::<2>(),
        Some(&[IndicatorCommand::StopFlashing, IndicatorCommand::Solid(true)])
    );
}

#[test]
fn test_timers_idle_without_transition() {
    let mut rig = Rig::started();
    rig.type_keys("123");

    let transitions = rig.run_for(60_000);

    assert!(transitions.is_empty());
    assert_eq!(rig.state(), DoorState::EnteringPassword);
    assert_eq!(rig.controller.buffer_len(), 3);
}

#[test]
fn test_clear_on_empty_buffer_is_noop() {
    let mut rig = Rig::started();

    assert!(rig.type_keys("*").is_empty());

    assert_eq!(rig.state(), DoorState::EnteringPassword);
    assert_eq!(rig.controller.buffer_len(), 0);
    assert_eq!(rig.screen().0, "Nothing to Clear");
}

#[test]
fn test_buffer_saturates_at_max_length() {
    let mut rig = Rig::started();

    rig.type_keys("123456789012");

    assert_eq!(rig.controller.buffer_len(), 8);
    assert_eq!(rig.screen().1, "********");
}

#[test]
fn test_overlong_entry_is_wrong_password() {
    let mut rig = Rig::started();

    rig.type_keys("12345#");

    assert_eq!(rig.state(), DoorState::EnteringPassword);
    assert_eq!(rig.controller.failed_attempts(), 1);
}

#[rstest]
#[case('A', "Door Lock v1.0", "Attempts: 1")]
#[case('C', "Attempts Reset", "")]
#[case('D', "Door: CLOSED", "Ready")]
fn test_special_key_screens(#[case] key: char, #[case] line1: &str, #[case] line2: &str) {
    let mut rig = Rig::started();
    fail_times(&mut rig, 1);
    rig.type_keys("12");

    rig.type_keys(&key.to_string());

    assert_eq!(rig.screen(), (line1.to_string(), line2.to_string()));
    assert_eq!(rig.controller.buffer_len(), 2);
    assert_eq!(rig.state(), DoorState::EnteringPassword);
}

#[test]
fn test_special_screen_returns_to_prompt_after_hold() {
    let mut rig = Rig::started();
    rig.type_keys("12D");

    rig.run_for(1_900);
    assert_eq!(rig.screen().0, "Door: CLOSED");
    rig.run_for(100);
    assert_eq!(rig.screen(), ("Enter Password:".to_string(), "**".to_string()));
}

#[test]
fn test_flash_rate_toggle_applies_to_next_opening() {
    let mut rig = Rig::started();

    rig.type_keys("B");
    assert_eq!(rig.screen().0, "Fast Flash ON");
    rig.type_keys("1234#");
    assert_eq!(rig.indicator.flashing(), Some(Duration::from_millis(200)));

    rig.run_for(10_000);
    rig.type_keys("B1234#");
    assert_eq!(rig.indicator.flashing(), Some(Duration::from_millis(500)));
}

#[test]
fn test_reset_key_prevents_lockout() {
    let mut rig = Rig::started();

    fail_times(&mut rig, 2);
    rig.type_keys("C");
    fail_times(&mut rig, 2);

    assert_eq!(rig.state(), DoorState::EnteringPassword);
    assert_eq!(rig.controller.failed_attempts(), 2);
}

#[test]
fn test_wrong_password_does_not_block_timers() {
    let mut rig = Rig::started();
    fail_times(&mut rig, 1);

    // notice still on screen but the loop keeps ticking
    rig.run_for(500);
    rig.type_keys("1234#");

    assert_eq!(rig.state(), DoorState::DoorOpen);
}

#[test]
fn test_servo_lock_pulse_widths() {
    let mut rig = Rig::new(servo_config());
    rig.controller.start();

    assert_eq!(
        rig.lock.output(),
        ActuatorOutput::Servo {
            period_ms: 20,
            pulse_ms: 1
        }
    );

    rig.type_keys("1234#");
    assert_eq!(
        rig.lock.output(),
        ActuatorOutput::Servo {
            period_ms: 20,
            pulse_ms: 2
        }
    );
}

#[test]
fn test_door_flag_tracks_open_state() {
    let mut rig = Rig::started();
    let flag = rig.controller.door_flag();

    rig.type_keys("1234#");
    assert!(flag.is_open());

    rig.run_for(10_000);
    assert!(!flag.is_open());
}

#[test]
fn test_history_is_bounded() {
    let mut rig = Rig::started();

    for _ in 0..20 {
        rig.type_keys("1234#");
        rig.run_for(10_000);
    }

    let history = rig.controller.history();
    assert_eq!(history.len(), doorlock_controller::MAX_HISTORY_SIZE);
    assert!(history.iter().all(|t| t.from.can_transition_to(&t.to)));
}
