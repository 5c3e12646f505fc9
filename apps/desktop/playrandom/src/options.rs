//! Process-level launch options read from the command line.
//!
//! | flag | default |
//! |---|---|
//! | `--log-dir <path>` | `<data_local_dir>/playrandom/logs` |
//! | `--config-dir <path>` | `<config_dir>/playrandom` |
//! | `--instance-id <id>` | `identifier` from `instance.toml` |
//!
//! Paths are taken verbatim from the OS argument vector, as `--flag <path>` or
//! `--flag=<path>`. The argument grammar treats `\` as an escape and spaces as
//! separators, which would mangle Windows paths and any path with a space.

use crate::error::PlayRandomError;

use common::{BINARY_NAME, ErrorLocation};
use instance_core::args::{Comparison, ParsedArguments};

use std::ffi::{OsStr, OsString};
use std::panic::Location;
use std::path::PathBuf;

pub const LOG_DIR_FLAG: &str = "log-dir";
pub const CONFIG_DIR_FLAG: &str = "config-dir";
pub const INSTANCE_ID_FLAG: &str = "instance-id";

const LOG_DIR_NAME: &str = "logs";
const LONG_PREFIX: &str = "--";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    pub log_dir: PathBuf,
    pub config_dir: PathBuf,
    pub instance_id: Option<String>,
}

impl LaunchOptions {
    /// Resolves the options from this process's arguments.
    ///
    /// # Errors
    ///
    /// See [`LaunchOptions::from_args`].
    #[track_caller]
    pub fn from_env(args: &ParsedArguments) -> Result<Self, PlayRandomError> {
        Self::from_args(std::env::args_os().skip(1), args)
    }

    /// Resolves the options, falling back to the per-user platform directories.
    ///
    /// `raw` is the unparsed argument vector without the executable path; directory
    /// options are read from it. `args` is its parsed form.
    ///
    /// # Errors
    ///
    /// Returns [`PlayRandomError::Startup`] when a directory is neither given nor
    /// resolvable for this platform.
    #[track_caller]
    pub fn from_args<I, S>(raw: I, args: &ParsedArguments) -> Result<Self, PlayRandomError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let location = ErrorLocation::from(Location::caller());
        let raw = raw.into_iter().map(Into::into).collect::<Vec<OsString>>();

        let log_dir = match raw_path_option(&raw, LOG_DIR_FLAG) {
            Some(dir) => dir,
            None => dirs::data_local_dir()
                .map(|dir| dir.join(BINARY_NAME).join(LOG_DIR_NAME))
                .ok_or_else(|| PlayRandomError::Startup {
                    message: "Could not resolve the log directory".to_string(),
                    location,
                })?,
        };

        let config_dir = match raw_path_option(&raw, CONFIG_DIR_FLAG) {
            Some(dir) => dir,
            None => dirs::config_dir()
                .map(|dir| dir.join(BINARY_NAME))
                .ok_or_else(|| PlayRandomError::Startup {
                    message: "Could not resolve the config directory".to_string(),
                    location,
                })?,
        };

        let instance_id = args
            .find(INSTANCE_ID_FLAG, Comparison::IgnoreCase)
            .map(str::to_string);

        Ok(Self {
            log_dir,
            config_dir,
            instance_id,
        })
    }
}

/// First `--flag <path>` or `--flag=<path>` in `raw`, flag name compared case-insensitively.
fn raw_path_option(raw: &[OsString], flag: &str) -> Option<PathBuf> {
    let mut tokens = raw.iter();

    while let Some(token) = tokens.next() {
        let Some(name) = token
            .to_str()
            .and_then(|token| token.strip_prefix(LONG_PREFIX))
        else {
            continue;
        };

        if name.eq_ignore_ascii_case(flag) {
            match tokens.next() {
                Some(value) if !is_long_flag(value) => return Some(PathBuf::from(value)),
                // `--log-dir --config-dir x` leaves log-dir unset, as the parser does.
                _ => return None,
            }
        }

        match name.split_once('=') {
            Some((name, value)) if name.eq_ignore_ascii_case(flag) => {
                return Some(PathBuf::from(value));
            }
            _ => {}
        }
    }

    None
}

fn is_long_flag(token: &OsStr) -> bool {
    token
        .to_str()
        .is_some_and(|token| token.starts_with(LONG_PREFIX))
}
