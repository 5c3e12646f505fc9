use common::ErrorLocation;

use std::io::Error as IoError;
use std::panic::Location;

use thiserror::Error as ThisError;

/// Failures while reading one activation line. Never escapes the server loop.
#[derive(Debug, ThisError)]
pub enum ProtocolError {
    #[error("Malformed Message Error: {message} {location}")]
    MalformedMessage {
        message: String,
        location: ErrorLocation,
    },

    #[error("Read Timeout Error: {message} {location}")]
    ReadTimeout {
        message: String,
        location: ErrorLocation,
    },

    #[error("IO Error: {message} {location}")]
    Io {
        message: String,
        location: ErrorLocation,
    },
}

impl From<IoError> for ProtocolError {
    #[track_caller]
    fn from(error: IoError) -> Self {
        ProtocolError::Io {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
