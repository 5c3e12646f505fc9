use common::ErrorLocation;

use thiserror::Error;

/// Errors that end a launch of the application.
///
/// Everything recoverable (an unreachable Primary, a failed boot registration, a
/// malformed activation) is handled inside `instance-core` and never reaches here.
#[derive(Debug, Error)]
pub enum PlayRandomError {
    /// Startup could not complete: directories, config, runtime.
    #[error("Startup Error: {message} {location}")]
    Startup {
        message: String,
        location: ErrorLocation,
    },

    /// Single-instance coordination failed fatally.
    #[error("Coordinator Error: {message} {location}")]
    Coordinator {
        message: String,
        location: ErrorLocation,
    },

    /// Logger could not be installed
    #[error("Logger Error: {message} {location}")]
    Logger {
        message: String,
        location: ErrorLocation,
    },
}
