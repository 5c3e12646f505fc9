use crate::error::CoordinatorError;
use crate::protocol::{ActivationMessage, InstanceIdentity};

use common::ErrorLocation;

use std::io::{Error as IoError, ErrorKind};
use std::panic::Location;
use std::time::Duration;

use interprocess::local_socket::tokio::{Stream, prelude::*};
use log::{debug, info};
use tokio::io::AsyncWriteExt;
use tokio::time::timeout as TokioTimeout;

/// Connects to the Primary's endpoint and delivers one message.
///
/// The whole exchange (connect, write, flush) is bounded by `connect_timeout`, so a
/// Primary that is stuck or shutting down cannot hang the Secondary. There is no retry.
///
/// # Errors
///
/// - [`CoordinatorError::ConnectTimeout`] - nothing answered within the timeout
/// - [`CoordinatorError::ConnectRefused`] - no server is bound to the endpoint
/// - [`CoordinatorError::Transport`] - the endpoint name is invalid or the write failed
pub async fn send_activation(
    identity: &InstanceIdentity,
    message: ActivationMessage,
    connect_timeout: Duration,
) -> Result<(), CoordinatorError> {
    let endpoint = identity.endpoint_id();
    let name = identity
        .endpoint_name()
        .map_err(|e| CoordinatorError::Transport {
            message: format!("Invalid endpoint name {endpoint}"),
            location: ErrorLocation::from(Location::caller()),
            source: e,
        })?;

    debug!("Connecting to activation endpoint {endpoint}");

    let exchange = async {
        let stream = Stream::connect(name).await.map_err(|e| connect_error(&endpoint, e))?;
        let (_receiver, mut sender) = stream.split();

        sender
            .write_all(message.to_line().as_bytes())
            .await
            .map_err(|e| CoordinatorError::Transport {
                message: format!("Failed to write {message} to {endpoint}"),
                location: ErrorLocation::from(Location::caller()),
                source: e,
            })?;

        sender.flush().await.map_err(|e| CoordinatorError::Transport {
            message: format!("Failed to flush {message} to {endpoint}"),
            location: ErrorLocation::from(Location::caller()),
            source: e,
        })?;

        Ok::<(), CoordinatorError>(())
    };

    match TokioTimeout(connect_timeout, exchange).await {
        Ok(Ok(())) => {
            info!("Forwarded {message} to the running instance");
            Ok(())
        }
        Ok(Err(e)) => Err(e),
        Err(_) => Err(CoordinatorError::ConnectTimeout {
            message: format!(
                "No answer from {endpoint} within {}ms",
                connect_timeout.as_millis()
            ),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}

fn connect_error(endpoint: &str, error: IoError) -> CoordinatorError {
    match error.kind() {
        ErrorKind::ConnectionRefused | ErrorKind::NotFound | ErrorKind::AddrNotAvailable => {
            CoordinatorError::ConnectRefused {
                message: format!("Nothing is listening on {endpoint}"),
                location: ErrorLocation::from(Location::caller()),
                source: error,
            }
        }
        _ => CoordinatorError::Transport {
            message: format!("Failed to connect to {endpoint}"),
            location: ErrorLocation::from(Location::caller()),
            source: error,
        },
    }
}
