use crate::config::CoordinatorConfig;
use crate::error::ConfigError;
use crate::protocol::InstanceScope;
use crate::{DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_READ_TIMEOUT_MS, DEFAULT_SHUTDOWN_TIMEOUT_MS};

use std::fs::write;
use std::time::Duration;

use tempfile::TempDir;

fn dir_with_config(contents: &str) -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    write(dir.path().join("instance.toml"), contents).expect("write config");
    dir
}

/// **VALUE**: Verifies a missing config file yields the defaults.
///
/// **WHY THIS MATTERS**: First launches have no config file at all.
///
/// **BUG THIS CATCHES**: Would catch treating a missing file as a read error.
#[test]
fn given_missing_file_when_loaded_then_defaults() {
    let dir = TempDir::new().expect("create temp dir");

    let config = CoordinatorConfig::load(dir.path()).expect("defaults");

    assert_eq!(config, CoordinatorConfig::default());
    assert_eq!(config.identifier, common::APP_IDENTIFIER);
    assert_eq!(config.scope, InstanceScope::Session);
    assert_eq!(
        config.connect_timeout(),
        Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS)
    );
    assert_eq!(
        config.read_timeout(),
        Duration::from_millis(DEFAULT_READ_TIMEOUT_MS)
    );
    assert_eq!(
        config.shutdown_timeout(),
        Duration::from_millis(DEFAULT_SHUTDOWN_TIMEOUT_MS)
    );
}

/// **VALUE**: Verifies every field is read and omitted fields keep their defaults.
#[test]
fn given_partial_file_when_loaded_then_fields_merged_with_defaults() {
    let dir = dir_with_config(
        r#"
identifier = "com.example.other"
scope = "global"
connect_timeout_ms = 250
"#,
    );

    let config = CoordinatorConfig::load(dir.path()).expect("valid config");

    assert_eq!(config.identifier, "com.example.other");
    assert_eq!(config.scope, InstanceScope::Global);
    assert_eq!(config.connect_timeout_ms, 250);
    assert_eq!(config.read_timeout_ms, DEFAULT_READ_TIMEOUT_MS);
    assert_eq!(config.identity().mutex_name(), "Global-com.example.other");
}

/// **VALUE**: Verifies misspelled keys are rejected.
///
/// **WHY THIS MATTERS**: A typo in `connect_timeout_ms` would otherwise be silently ignored.
///
/// **BUG THIS CATCHES**: Would catch removing `deny_unknown_fields`.
#[test]
fn given_unknown_field_when_loaded_then_parse_error() {
    let dir = dir_with_config("conect_timeout_ms = 100\n");

    let result = CoordinatorConfig::load(dir.path());

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

/// **VALUE**: Verifies invalid TOML surfaces as a parse error with the path.
#[test]
fn given_invalid_toml_when_loaded_then_parse_error_names_file() {
    let dir = dir_with_config("identifier = \n");

    let error = CoordinatorConfig::load(dir.path()).expect_err("invalid toml");

    assert!(matches!(error, ConfigError::ParseError { .. }));
    assert!(error.to_string().contains("instance.toml"));
}

/// **VALUE**: Verifies out of range timeouts are rejected.
///
/// **WHY THIS MATTERS**: A zero connect timeout makes every Secondary report failure.
///
/// **BUG THIS CATCHES**: Would catch a range check that skips one of the timeouts.
#[test]
fn given_out_of_range_timeouts_when_loaded_then_validation_error() {
    for contents in [
        "connect_timeout_ms = 0\n",
        "connect_timeout_ms = 10001\n",
        "read_timeout_ms = 0\n",
        "shutdown_timeout_ms = 30001\n",
    ] {
        let dir = dir_with_config(contents);

        let result = CoordinatorConfig::load(dir.path());

        assert!(
            matches!(result, Err(ConfigError::ValidationError { .. })),
            "{contents:?} should be rejected"
        );
    }
}

/// **VALUE**: Verifies identifiers are restricted to characters valid in every resource name.
///
/// **WHY THIS MATTERS**: The identifier becomes part of a file name and a pipe name.
///
/// **BUG THIS CATCHES**: Would catch path separators slipping into the lock path.
#[test]
fn given_invalid_identifier_when_validated_then_validation_error() {
    for identifier in ["", "a/b", "with space", "back\\slash"] {
        let config = CoordinatorConfig {
            identifier: identifier.to_string(),
            ..Default::default()
        };

        assert!(
            matches!(config.validate(), Err(ConfigError::ValidationError { .. })),
            "{identifier:?} should be rejected"
        );
    }

    let valid = CoordinatorConfig {
        identifier: "com.example_app-2".to_string(),
        ..Default::default()
    };
    assert!(valid.validate().is_ok());
}

/// **VALUE**: Verifies config errors point at the code that asked for the config.
///
/// **WHY THIS MATTERS**: A log line saying the failure came from inside the loader
/// does not tell the reader which launch step tripped over the file.
///
/// **BUG THIS CATCHES**: Would catch `load` or `validate` losing `#[track_caller]`.
#[test]
fn given_invalid_config_when_loaded_then_location_is_the_caller() {
    let parse = dir_with_config("identifier = \n");
    let range = dir_with_config("read_timeout_ms = 0\n");

    let parse_error = CoordinatorConfig::load(parse.path()).expect_err("invalid toml");
    let range_error = CoordinatorConfig::load(range.path()).expect_err("out of range");
    let validate_error = CoordinatorConfig {
        identifier: String::new(),
        ..CoordinatorConfig::default()
    }
    .validate()
    .expect_err("empty identifier");

    for error in [parse_error, range_error, validate_error] {
        let (ConfigError::ParseError { location, .. } | ConfigError::ValidationError { location, .. }) =
            &error
        else {
            panic!("unexpected error {error}");
        };
        assert_eq!(location.file, file!(), "{error}");
    }
}
