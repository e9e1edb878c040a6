//! Letter-key side channel.
//!
//! `A`..`D` never touch the password buffer or the operating mode. Each key
//! maps to a pure handler that turns a read-only view of the controller into
//! a screen and, at most, one mutation for the controller to apply.

use doorlock_core::constants::FIRMWARE_BANNER;

use crate::screens::Screen;
use crate::state::DoorState;

/// Read-only snapshot handed to special-key handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerView {
    pub state: DoorState,
    pub failed_attempts: u32,
    pub max_failed_attempts: u32,
    pub fast_flash: bool,
    pub door_remaining_secs: Option<u64>,
    pub lockout_remaining_secs: Option<u64>,
}

/// Controller change requested by a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// Switch between normal and fast flashing for later openings.
    ToggleFlashRate,

    /// Clear the failed-attempt counter.
    ResetFailedAttempts,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialKeyOutcome {
    pub screen: Screen,
    pub mutation: Option<Mutation>,
}

impl SpecialKeyOutcome {
    fn show(screen: Screen) -> Self {
        Self {
            screen,
            mutation: None,
        }
    }

    fn apply(screen: Screen, mutation: Mutation) -> Self {
        Self {
            screen,
            mutation: Some(mutation),
        }
    }
}

pub type SpecialKeyHandler = fn(&ControllerView) -> SpecialKeyOutcome;

const SPECIAL_KEYS: [(char, SpecialKeyHandler); 4] = [
    ('A', system_status),
    ('B', toggle_flash_rate),
    ('C', reset_attempts),
    ('D', door_status),
];

/// Handler for a letter key, if one is bound.
pub fn lookup(letter: char) -> Option<SpecialKeyHandler> {
    SPECIAL_KEYS
        .iter()
        .find(|(key, _)| *key == letter)
        .map(|(_, handler)| *handler)
}

fn system_status(view: &ControllerView) -> SpecialKeyOutcome {
    SpecialKeyOutcome::show(Screen::new(
        FIRMWARE_BANNER,
        format!("Attempts: {}", view.failed_attempts),
    ))
}

fn toggle_flash_rate(view: &ControllerView) -> SpecialKeyOutcome {
    let label = if view.fast_flash {
        "Normal Flash"
    } else {
        "Fast Flash ON"
    };
    SpecialKeyOutcome::apply(Screen::new(label, ""), Mutation::ToggleFlashRate)
}

fn reset_attempts(view: &ControllerView) -> SpecialKeyOutcome {
    if view.failed_attempts == 0 {
        return SpecialKeyOutcome::show(Screen::new("No Attempts", ""));
    }
    SpecialKeyOutcome::apply(
        Screen::new("Attempts Reset", ""),
        Mutation::ResetFailedAttempts,
    )
}

fn door_status(view: &ControllerView) -> SpecialKeyOutcome {
    let screen = match (view.door_remaining_secs, view.lockout_remaining_secs) {
        (Some(secs), _) => Screen::new("Door: OPEN", format!("Closes in {secs}s")),
        (None, Some(secs)) => Screen::new("Door: LOCKED", format!("Unlock in {secs}s")),
        (None, None) => Screen::new("Door: CLOSED", "Ready"),
    };
    SpecialKeyOutcome::show(screen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn idle() -> ControllerView {
        ControllerView {
            state: DoorState::EnteringPassword,
            failed_attempts: 0,
            max_failed_attempts: 3,
            fast_flash: false,
            door_remaining_secs: None,
            lockout_remaining_secs: None,
        }
    }

    #[rstest]
    #[case('A', true)]
    #[case('B', true)]
    #[case('C', true)]
    #[case('D', true)]
    #[case('E', false)]
    #[case('1', false)]
    fn test_lookup(#[case] letter: char, #[case] bound: bool) {
        assert_eq!(lookup(letter).is_some(), bound);
    }

    #[rstest]
    fn test_status_reports_attempts(idle: ControllerView) {
        let view = ControllerView {
            failed_attempts: 2,
            ..idle
        };
        let outcome = system_status(&view);
        assert_eq!(outcome.screen, Screen::new(FIRMWARE_BANNER, "Attempts: 2"));
        assert_eq!(outcome.mutation, None);
    }

    #[rstest]
    fn test_flash_toggle_labels(idle: ControllerView) {
        let outcome = toggle_flash_rate(&idle);
        assert_eq!(outcome.screen.line1, "Fast Flash ON");
        assert_eq!(outcome.mutation, Some(Mutation::ToggleFlashRate));

        let fast = ControllerView {
            fast_flash: true,
            ..idle
        };
        assert_eq!(toggle_flash_rate(&fast).screen.line1, "Normal Flash");
    }

    #[rstest]
    fn test_reset_only_when_needed(idle: ControllerView) {
        assert_eq!(reset_attempts(&idle).mutation, None);
        assert_eq!(reset_attempts(&idle).screen.line1, "No Attempts");

        let failed = ControllerView {
            failed_attempts: 1,
            ..idle
        };
        let outcome = reset_attempts(&failed);
        assert_eq!(outcome.screen.line1, "Attempts Reset");
        assert_eq!(outcome.mutation, Some(Mutation::ResetFailedAttempts));
    }

    #[rstest]
    #[case(None, None, "Door: CLOSED", "Ready")]
    #[case(Some(7), None, "Door: OPEN", "Closes in 7s")]
    #[case(None, Some(12), "Door: LOCKED", "Unlock in 12s")]
    fn test_door_status(
        idle: ControllerView,
        #[case] door: Option<u64>,
        #[case] lockout: Option<u64>,
        #[case] line1: &str,
        #[case] line2: &str,
    ) {
        let view = ControllerView {
            door_remaining_secs: door,
            lockout_remaining_secs: lockout,
            ..idle
        };
        let outcome = door_status(&view);
        assert_eq!(outcome.screen, Screen::new(line1, line2));
        assert_eq!(outcome.mutation, None);
    }
}
