//! Boot registration toggle, applied before coordination.
//!
//! `--set-startup <true|1|false|0>` must take effect even on a launch that ends up
//! forwarding to a running instance, so it is evaluated right after argument parsing.
//! How a platform registers an application for boot is behind [`StartOnBoot`];
//! [`AutostartEntry`] is the file/registry backed implementation shipped here.

mod autostart;

pub use autostart::AutostartEntry;

use crate::args::{Comparison, ParsedArguments};
use crate::error::StartupError;

use log::{debug, error, info, warn};

/// Flag that toggles boot registration.
pub const SET_STARTUP_FLAG: &str = "set-startup";

/// Flag the boot registration launches the application with.
pub const STARTUP_FLAG: &str = "startup";

/// Value written after [`STARTUP_FLAG`]; flags without a value are not recorded by the parser.
pub const STARTUP_FLAG_VALUE: &str = "true";

/// Capability to register the application to start with the operating system.
pub trait StartOnBoot {
    fn set_start_on_boot(&self, enabled: bool) -> Result<(), StartupError>;

    fn start_on_boot(&self) -> Result<bool, StartupError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupToggle {
    Enable,
    Disable,
}

impl StartupToggle {
    /// Case-insensitive `true`/`1`/`false`/`0`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "true" | "1" => Some(StartupToggle::Enable),
            "false" | "0" => Some(StartupToggle::Disable),
            _ => None,
        }
    }

    pub fn enabled(self) -> bool {
        matches!(self, StartupToggle::Enable)
    }
}

/// What [`apply_startup_flag`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    NotRequested,
    Applied(bool),
    /// Unrecognized value, the collaborator was not called.
    Invalid(String),
    /// The collaborator failed; startup continues regardless.
    Failed(bool),
}

/// Applies `--set-startup` if present. Never blocks startup.
pub fn apply_startup_flag(args: &ParsedArguments, boot: &dyn StartOnBoot) -> ToggleOutcome {
    let Some(value) = args.find(SET_STARTUP_FLAG, Comparison::IgnoreCase) else {
        return ToggleOutcome::NotRequested;
    };

    debug!("Setting startup to {value}");

    let Some(toggle) = StartupToggle::parse(value) else {
        warn!("Invalid value '{value}' for --{SET_STARTUP_FLAG}, expected true, 1, false or 0");
        return ToggleOutcome::Invalid(value.to_string());
    };

    let enabled = toggle.enabled();
    match boot.set_start_on_boot(enabled) {
        Ok(()) => {
            info!("Start on boot {}", if enabled { "enabled" } else { "disabled" });
            ToggleOutcome::Applied(enabled)
        }
        Err(e) => {
            error!("Failed to change start on boot: {e}");
            ToggleOutcome::Failed(enabled)
        }
    }
}

/// How the current launch came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchType {
    /// Started manually by the user.
    Manual,
    /// Started manually, but the user has boot registration enabled.
    UserStartup,
    /// Started by the boot registration itself.
    SystemStartup,
}

impl LaunchType {
    pub fn detect(args: &ParsedArguments, boot: &dyn StartOnBoot) -> Self {
        if args.has(STARTUP_FLAG, Comparison::IgnoreCase) {
            return LaunchType::SystemStartup;
        }

        match boot.start_on_boot() {
            Ok(true) => LaunchType::UserStartup,
            Ok(false) => LaunchType::Manual,
            Err(e) => {
                warn!("Could not read start on boot state: {e}");
                LaunchType::Manual
            }
        }
    }
}
