//! Activation server handle type.

use crate::error::CoordinatorError;

use common::ErrorLocation;

use std::panic::Location;
use std::time::Duration;

use log::{info, warn};
use tokio::sync::watch::Sender as WatchSender;
use tokio::task::JoinHandle;
use tokio::time::timeout as TokioTimeout;

/// Handle to the running activation server.
///
/// Returned by [`start_activation_server`](crate::coordinator::start_activation_server).
/// The server loop observes the cancellation signal at its accept and read steps.
///
/// # Lifecycle
///
/// Keep the handle alive for the lifetime of the Primary. Dropping it closes the
/// cancellation channel, which also stops the loop, but without waiting for it.
/// Prefer [`ActivationServerHandle::shutdown`] on graceful exit.
#[derive(Debug)]
pub struct ActivationServerHandle {
    endpoint: String,
    shutdown_tx: WatchSender<bool>,
    task: JoinHandle<()>,
}

impl ActivationServerHandle {
    pub(crate) fn new(endpoint: String, shutdown_tx: WatchSender<bool>, task: JoinHandle<()>) -> Self {
        Self {
            endpoint,
            shutdown_tx,
            task,
        }
    }

    /// Endpoint the server is bound to, for diagnostics.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Signals cancellation and waits up to `timeout` for the loop to exit.
    ///
    /// The endpoint is released when the loop drops its listener. Connection attempts
    /// made after this returns are refused.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::Teardown`] if the loop panicked or did not stop in
    /// time (it is aborted in that case). Callers log it and carry on exiting.
    pub async fn shutdown(self, timeout: Duration) -> Result<(), CoordinatorError> {
        info!("Stopping activation server on {}", self.endpoint);

        // Err only means the loop already ended and dropped its receiver.
        let _ = self.shutdown_tx.send(true);

        let abort_handle = self.task.abort_handle();
        match TokioTimeout(timeout, self.task).await {
            Ok(Ok(())) => {
                info!("Activation server stopped");
                Ok(())
            }
            Ok(Err(e)) => Err(CoordinatorError::Teardown {
                message: format!("Activation server task failed: {e}"),
                location: ErrorLocation::from(Location::caller()),
            }),
            Err(_) => {
                warn!(
                    "Activation server did not stop within {}ms, aborting",
                    timeout.as_millis()
                );
                abort_handle.abort();
                Err(CoordinatorError::Teardown {
                    message: format!(
                        "Activation server did not stop within {}ms",
                        timeout.as_millis()
                    ),
                    location: ErrorLocation::from(Location::caller()),
                })
            }
        }
    }
}
