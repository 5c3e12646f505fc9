use common::ErrorLocation;

use std::io::Error as IoError;

use thiserror::Error as ThisError;

/// Failures of single-instance arbitration and the activation channel transport.
///
/// Only [`CoordinatorError::MutexAcquisition`] is fatal to startup. Connect failures
/// are surfaced once to the user by a Secondary; teardown failures are logged.
#[derive(Debug, ThisError)]
pub enum CoordinatorError {
    #[error("Mutex Acquisition Error: {message} {location}")]
    MutexAcquisition {
        message: String,
        location: ErrorLocation,
        #[source]
        source: IoError,
    },

    #[error("Connect Timeout Error: {message} {location}")]
    ConnectTimeout {
        message: String,
        location: ErrorLocation,
    },

    #[error("Connect Refused Error: {message} {location}")]
    ConnectRefused {
        message: String,
        location: ErrorLocation,
        #[source]
        source: IoError,
    },

    #[error("Transport Error: {message} {location}")]
    Transport {
        message: String,
        location: ErrorLocation,
        #[source]
        source: IoError,
    },

    #[error("Bind Error: {message} {location}")]
    Bind {
        message: String,
        location: ErrorLocation,
        #[source]
        source: IoError,
    },

    #[error("Role Error: {message} {location}")]
    Role {
        message: String,
        location: ErrorLocation,
    },

    #[error("Teardown Error: {message} {location}")]
    Teardown {
        message: String,
        location: ErrorLocation,
    },
}

impl CoordinatorError {
    /// `true` for the failures a Secondary reports as "could not reach the running instance".
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            CoordinatorError::ConnectTimeout { .. }
                | CoordinatorError::ConnectRefused { .. }
                | CoordinatorError::Transport { .. }
        )
    }
}
