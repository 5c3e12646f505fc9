use common::ErrorLocation;

use std::path::PathBuf;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum StartupError {
    #[error("Startup Unsupported Error: {message} {location}")]
    Unsupported {
        message: String,
        location: ErrorLocation,
    },

    #[error("Startup IO Error: {path}: {source} {location}")]
    Io {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Startup Registry Error: {message} {location}")]
    Registry {
        message: String,
        location: ErrorLocation,
    },

    #[error("Startup Path Unavailable Error: {message} {location}")]
    PathUnavailable {
        message: String,
        location: ErrorLocation,
    },
}
