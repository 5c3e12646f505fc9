use instance_core::error::CoordinatorError;

use common::ErrorLocation;

use std::error::Error;
use std::io::{Error as IoError, ErrorKind};
use std::panic::Location;

/// **VALUE**: Verifies `CoordinatorError::MutexAcquisition` carries its location and source.
///
/// **WHY THIS MATTERS**: It is the only fatal startup fault; the log line must say where
/// it came from and what the OS reported.
///
/// **BUG THIS CATCHES**: Would catch losing the location from the Display format or
/// dropping the `#[source]` attribute.
#[test]
#[track_caller]
fn given_mutex_error_when_formatted_then_includes_location_and_source() {
    // GIVEN
    let err = CoordinatorError::MutexAcquisition {
        message: "Failed to open lock file".to_string(),
        location: ErrorLocation::from(Location::caller()),
        source: IoError::new(ErrorKind::PermissionDenied, "permission denied"),
    };

    // WHEN
    let error_string = err.to_string();

    // THEN
    assert!(error_string.starts_with("Mutex Acquisition Error: Failed to open lock file"));
    assert!(error_string.contains("coordinator.rs"));
    assert!(err.source().is_some());
    assert!(!err.is_unreachable());
}

/// **VALUE**: Verifies which failures count as "the running instance could not be reached".
///
/// **WHY THIS MATTERS**: The Secondary shows a single user-facing message for exactly these.
///
/// **BUG THIS CATCHES**: Would catch a role or bind error being reported to the user as
/// a connection problem.
#[test]
fn given_each_variant_when_classified_then_only_transport_failures_unreachable() {
    let location = ErrorLocation::from(Location::caller());
    let io = || IoError::new(ErrorKind::ConnectionRefused, "refused");

    let unreachable = [
        CoordinatorError::ConnectTimeout {
            message: "timeout".to_string(),
            location,
        },
        CoordinatorError::ConnectRefused {
            message: "refused".to_string(),
            location,
            source: io(),
        },
        CoordinatorError::Transport {
            message: "broken pipe".to_string(),
            location,
            source: io(),
        },
    ];
    let reachable = [
        CoordinatorError::Bind {
            message: "bind".to_string(),
            location,
            source: io(),
        },
        CoordinatorError::Role {
            message: "role".to_string(),
            location,
        },
        CoordinatorError::Teardown {
            message: "teardown".to_string(),
            location,
        },
    ];

    assert!(unreachable.iter().all(CoordinatorError::is_unreachable));
    assert!(!reachable.iter().any(CoordinatorError::is_unreachable));
}
