//! Activation server implementation.
//!
//! Runs in the Primary as one background task and serves the named local endpoint:
//!
//! - accepts one connection at a time
//! - reads at most one line per connection, bounded by a read timeout
//! - matches it against [`ActivationMessage`] and hands matches to the UI context
//! - ignores and logs anything else
//!
//! Every iteration is fault-isolated: no single bad connection ends the loop. The
//! loop exits only when cancellation is signalled through the handle.

use crate::activation::{ActivationSender, DispatchOutcome};
use crate::coordinator::handle::ActivationServerHandle;
use crate::error::{CoordinatorError, ProtocolError};
use crate::protocol::{ActivationMessage, InstanceIdentity, MAX_LINE_BYTES};

use common::ErrorLocation;

use std::fs::remove_file;
use std::io::ErrorKind;
use std::panic::Location;
use std::time::Duration;

use interprocess::local_socket::ListenerOptions;
use interprocess::local_socket::tokio::{Listener, Stream, prelude::*};
use log::{debug, error, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::spawn as TokioSpawn;
use tokio::sync::watch::{Receiver as WatchReceiver, channel as watch_channel};
use tokio::time::{sleep as TokioSleep, timeout as TokioTimeout};

/// Pause after a failed accept so a persistent listener fault cannot spin the loop.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(50);

/// Binds the endpoint of `identity` and spawns the server loop.
///
/// Must only be called by the process holding the instance lock; the lock is what
/// guarantees no second server competes for the same endpoint.
///
/// # Errors
///
/// Returns [`CoordinatorError::Bind`] if the endpoint name is invalid on this platform
/// or the listener cannot be created.
pub async fn start_activation_server(
    identity: &InstanceIdentity,
    read_timeout: Duration,
    sender: ActivationSender,
) -> Result<ActivationServerHandle, CoordinatorError> {
    // A socket file left by a crashed Primary would make the bind fail. Holding the
    // lock means nobody else is serving it.
    if let Some(path) = identity.endpoint_path() {
        match remove_file(&path) {
            Ok(()) => info!("Removed stale endpoint {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove stale endpoint {}: {e}", path.display()),
        }
    }

    let endpoint = identity.endpoint_id();
    let name = identity
        .endpoint_name()
        .map_err(|e| CoordinatorError::Bind {
            message: format!("Invalid endpoint name {endpoint}"),
            location: ErrorLocation::from(Location::caller()),
            source: e,
        })?;

    let listener = ListenerOptions::new()
        .name(name)
        .create_tokio()
        .map_err(|e| CoordinatorError::Bind {
            message: format!("Failed to bind activation endpoint {endpoint}"),
            location: ErrorLocation::from(Location::caller()),
            source: e,
        })?;

    info!("Activation server listening on {endpoint}");

    let (shutdown_tx, shutdown_rx) = watch_channel(false);
    let task = TokioSpawn(serve(listener, read_timeout, sender, shutdown_rx));

    Ok(ActivationServerHandle::new(endpoint, shutdown_tx, task))
}

async fn serve(
    listener: Listener,
    read_timeout: Duration,
    sender: ActivationSender,
    mut shutdown_rx: WatchReceiver<bool>,
) {
    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        let stream = tokio::select! {
            _ = shutdown_rx.changed() => break,
            accepted = listener.accept() => match accepted {
                Ok(stream) => stream,
                Err(e) => {
                    warn!("Failed to accept activation connection: {e}");
                    TokioSleep(ACCEPT_RETRY_DELAY).await;
                    continue;
                }
            },
        };

        debug!("Activation connection accepted");

        match read_message(stream, read_timeout, &mut shutdown_rx).await {
            Ok(Some(message)) => dispatch(&sender, message),
            Ok(None) => debug!("Activation connection closed without a message"),
            Err(e) => warn!("Ignoring activation connection: {e}"),
        }
    }

    drop(listener);
    info!("Activation server loop exited");
}

/// Reads the single line of one connection. `Ok(None)` for an empty connection or cancellation.
async fn read_message(
    stream: Stream,
    read_timeout: Duration,
    shutdown_rx: &mut WatchReceiver<bool>,
) -> Result<Option<ActivationMessage>, ProtocolError> {
    let (receiver, _sender) = stream.split();
    // One byte past the limit so an oversized line is detected rather than truncated.
    let mut reader = BufReader::new(receiver).take(MAX_LINE_BYTES as u64 + 1);
    let mut line = String::new();

    let read = tokio::select! {
        _ = shutdown_rx.changed() => return Ok(None),
        read = TokioTimeout(read_timeout, reader.read_line(&mut line)) => read,
    };

    let bytes = match read {
        Ok(result) => result?,
        Err(_) => {
            return Err(ProtocolError::ReadTimeout {
                message: format!("No line received within {}ms", read_timeout.as_millis()),
                location: ErrorLocation::from(Location::caller()),
            });
        }
    };

    if bytes == 0 {
        return Ok(None);
    }

    ActivationMessage::from_line(&line).map(Some)
}

fn dispatch(sender: &ActivationSender, message: ActivationMessage) {
    match sender.dispatch(message) {
        DispatchOutcome::Queued => info!("Received activation message: {message}"),
        DispatchOutcome::Coalesced => {
            info!("Activation message {message} coalesced with pending activations")
        }
        DispatchOutcome::Closed => {
            error!("Activation message {message} dropped: UI context is no longer receiving")
        }
    }
}
