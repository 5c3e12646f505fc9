use crate::args::ParsedArguments;
use crate::error::StartupError;
use crate::startup::{LaunchType, StartOnBoot, StartupToggle, ToggleOutcome, apply_startup_flag};

use common::ErrorLocation;

use std::cell::{Cell, RefCell};
use std::panic::Location;

/// Records calls instead of touching the operating system.
#[derive(Default)]
struct RecordingBoot {
    calls: RefCell<Vec<bool>>,
    registered: Cell<bool>,
    fail: bool,
}

impl RecordingBoot {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn registered() -> Self {
        let boot = Self::default();
        boot.registered.set(true);
        boot
    }

    fn error() -> StartupError {
        StartupError::Unsupported {
            message: "boot registration is disabled in tests".to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl StartOnBoot for RecordingBoot {
    fn set_start_on_boot(&self, enabled: bool) -> Result<(), StartupError> {
        self.calls.borrow_mut().push(enabled);
        if self.fail {
            return Err(Self::error());
        }
        self.registered.set(enabled);
        Ok(())
    }

    fn start_on_boot(&self) -> Result<bool, StartupError> {
        if self.fail {
            return Err(Self::error());
        }
        Ok(self.registered.get())
    }
}

/// **VALUE**: Verifies the accepted spellings of the toggle value.
#[test]
fn given_toggle_values_when_parsed_then_case_insensitive() {
    assert_eq!(StartupToggle::parse("true"), Some(StartupToggle::Enable));
    assert_eq!(StartupToggle::parse("TRUE"), Some(StartupToggle::Enable));
    assert_eq!(StartupToggle::parse("1"), Some(StartupToggle::Enable));
    assert_eq!(StartupToggle::parse("False"), Some(StartupToggle::Disable));
    assert_eq!(StartupToggle::parse("0"), Some(StartupToggle::Disable));
    assert_eq!(StartupToggle::parse("yes"), None);
    assert_eq!(StartupToggle::parse(""), None);
}

/// **VALUE**: Verifies `--set-startup` reaches the collaborator with the parsed value.
///
/// **WHY THIS MATTERS**: The flag must take effect before coordination, even on a launch
/// that later forwards to a running instance.
///
/// **BUG THIS CATCHES**: Would catch an inverted boolean or a case-sensitive flag lookup.
#[test]
fn given_set_startup_flag_when_applied_then_collaborator_called() {
    // GIVEN
    let boot = RecordingBoot::default();
    let enable = ParsedArguments::parse("--Set-Startup TRUE");
    let disable = ParsedArguments::parse("--set-startup 0");

    // WHEN
    let enabled = apply_startup_flag(&enable, &boot);
    let disabled = apply_startup_flag(&disable, &boot);

    // THEN
    assert_eq!(enabled, ToggleOutcome::Applied(true));
    assert_eq!(disabled, ToggleOutcome::Applied(false));
    assert_eq!(*boot.calls.borrow(), vec![true, false]);
}

/// **VALUE**: Verifies launches without the flag leave registration alone.
#[test]
fn given_no_flag_when_applied_then_not_requested() {
    let boot = RecordingBoot::default();

    let outcome = apply_startup_flag(&ParsedArguments::parse("--other 1"), &boot);

    assert_eq!(outcome, ToggleOutcome::NotRequested);
    assert!(boot.calls.borrow().is_empty());
}

/// **VALUE**: Verifies an unrecognized value never calls the collaborator.
///
/// **BUG THIS CATCHES**: Would catch treating any non-true value as "disable".
#[test]
fn given_invalid_value_when_applied_then_invalid_without_call() {
    let boot = RecordingBoot::default();

    let outcome = apply_startup_flag(&ParsedArguments::parse("--set-startup maybe"), &boot);

    assert_eq!(outcome, ToggleOutcome::Invalid("maybe".to_string()));
    assert!(boot.calls.borrow().is_empty());
}

/// **VALUE**: Verifies a failing collaborator does not abort startup.
///
/// **WHY THIS MATTERS**: A read-only registry must not prevent the application from opening.
///
/// **BUG THIS CATCHES**: Would catch propagating the registration error.
#[test]
fn given_failing_collaborator_when_applied_then_failed_outcome() {
    let boot = RecordingBoot::failing();

    let outcome = apply_startup_flag(&ParsedArguments::parse("--set-startup 1"), &boot);

    assert_eq!(outcome, ToggleOutcome::Failed(true));
    assert_eq!(*boot.calls.borrow(), vec![true]);
}

/// **VALUE**: Verifies how the launch type is derived.
///
/// **WHY THIS MATTERS**: A Primary started by boot registration opens hidden.
///
/// **BUG THIS CATCHES**: Would catch ignoring the `--startup` flag or a registration read error
/// aborting startup.
#[test]
fn given_launch_context_when_detected_then_launch_type() {
    let manual = ParsedArguments::parse("");
    let system = ParsedArguments::parse("--startup true");

    assert_eq!(
        LaunchType::detect(&system, &RecordingBoot::default()),
        LaunchType::SystemStartup
    );
    assert_eq!(
        LaunchType::detect(&manual, &RecordingBoot::registered()),
        LaunchType::UserStartup
    );
    assert_eq!(
        LaunchType::detect(&manual, &RecordingBoot::default()),
        LaunchType::Manual
    );
    assert_eq!(
        LaunchType::detect(&manual, &RecordingBoot::failing()),
        LaunchType::Manual
    );
}
