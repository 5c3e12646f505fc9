use crate::error::config::ConfigError;
use crate::protocol::{InstanceIdentity, InstanceScope};
use crate::{DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_READ_TIMEOUT_MS, DEFAULT_SHUTDOWN_TIMEOUT_MS};

use common::{APP_IDENTIFIER, ErrorLocation};

use std::panic::Location;
use std::path::Path;
use std::time::Duration;

use log::{info, warn};
use serde::Deserialize;

const CONFIG_FILE_NAME: &str = "instance.toml";

const MAX_CONNECT_TIMEOUT_MS: u64 = 10_000;
const MAX_READ_TIMEOUT_MS: u64 = 10_000;
const MAX_SHUTDOWN_TIMEOUT_MS: u64 = 30_000;

/// Tunables of single-instance coordination, read from `instance.toml`.
///
/// ```toml
/// identifier = "github.neonalig.playrandom"
/// scope = "session"          # or "global"
/// connect_timeout_ms = 500
/// read_timeout_ms = 1000
/// shutdown_timeout_ms = 2000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoordinatorConfig {
    #[serde(default = "default_identifier")]
    pub identifier: String,

    #[serde(default)]
    pub scope: InstanceScope,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    #[serde(default = "default_shutdown_timeout_ms")]
    pub shutdown_timeout_ms: u64,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            identifier: default_identifier(),
            scope: InstanceScope::default(),
            connect_timeout_ms: default_connect_timeout_ms(),
            read_timeout_ms: default_read_timeout_ms(),
            shutdown_timeout_ms: default_shutdown_timeout_ms(),
        }
    }
}

fn default_identifier() -> String {
    APP_IDENTIFIER.to_string()
}
fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}
fn default_read_timeout_ms() -> u64 {
    DEFAULT_READ_TIMEOUT_MS
}
fn default_shutdown_timeout_ms() -> u64 {
    DEFAULT_SHUTDOWN_TIMEOUT_MS
}

impl CoordinatorConfig {
    /// Load config from {config_dir}/instance.toml.
    ///
    /// # Returns
    ///
    /// Returns defaults if the file is missing.
    /// Returns `Err(ConfigError)` if the file exists but cannot be read, parsed or validated.
    #[track_caller]
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let location = ErrorLocation::from(Location::caller());
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file: {}", e);
            ConfigError::ReadError {
                location,
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: CoordinatorConfig = toml::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config TOML: {}", e);
            ConfigError::ParseError {
                location,
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    #[track_caller]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.identifier.is_empty() {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: "identifier cannot be empty".to_string(),
            });
        }

        // Becomes part of a file name, a socket/pipe name and a registry value name.
        if let Some(invalid) = self
            .identifier
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')))
        {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "Invalid character {invalid:?} in identifier: {}",
                    self.identifier
                ),
            });
        }

        check_range(
            "connect_timeout_ms",
            self.connect_timeout_ms,
            MAX_CONNECT_TIMEOUT_MS,
        )?;
        check_range("read_timeout_ms", self.read_timeout_ms, MAX_READ_TIMEOUT_MS)?;
        check_range(
            "shutdown_timeout_ms",
            self.shutdown_timeout_ms,
            MAX_SHUTDOWN_TIMEOUT_MS,
        )?;

        Ok(())
    }

    pub fn identity(&self) -> InstanceIdentity {
        InstanceIdentity::new(self.identifier.clone(), self.scope)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

#[track_caller]
fn check_range(field: &str, value: u64, max: u64) -> Result<(), ConfigError> {
    if value == 0 || value > max {
        return Err(ConfigError::ValidationError {
            location: ErrorLocation::from(Location::caller()),
            reason: format!("Invalid {field}: {value} (must be 1-{max})"),
        });
    }
    Ok(())
}
