//! Single-instance coordination.
//!
//! Arbitrates exactly one Primary per user session:
//!
//! ```text
//! Uninitialized → AcquireMutex → { Primary | Secondary }
//! ```
//!
//! - **Primary** holds the instance lock for its lifetime and runs the activation
//!   server ([`start_activation_server`]) in the background.
//! - **Secondary** forwards one [`ActivationMessage`](crate::protocol::ActivationMessage)
//!   to the Primary ([`send_activation`]) and terminates without continuing startup.
//!
//! The role is decided by the atomicity of the OS lock, never by application logic.

mod client;
mod handle;
mod mutex;
mod server;

pub use client::send_activation;
pub use handle::ActivationServerHandle;
pub use mutex::{InstanceLock, LockOutcome};
pub use server::start_activation_server;

use crate::activation::ActivationSender;
use crate::config::CoordinatorConfig;
use crate::error::CoordinatorError;
use crate::protocol::{ActivationMessage, InstanceIdentity};

use common::ErrorLocation;

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::panic::Location;

use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorRole {
    Primary,
    Secondary,
}

impl Display for CoordinatorRole {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        match self {
            CoordinatorRole::Primary => formatter.write_str("primary"),
            CoordinatorRole::Secondary => formatter.write_str("secondary"),
        }
    }
}

/// Decides this process's role once and drives the matching branch.
#[derive(Debug)]
pub struct InstanceCoordinator {
    config: CoordinatorConfig,
    identity: InstanceIdentity,
    role: Option<CoordinatorRole>,
    lock: Option<InstanceLock>,
}

impl InstanceCoordinator {
    pub fn new(config: CoordinatorConfig) -> Self {
        let identity = config.identity();
        Self {
            config,
            identity,
            role: None,
            lock: None,
        }
    }

    pub fn identity(&self) -> &InstanceIdentity {
        &self.identity
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// The decided role, `None` before [`InstanceCoordinator::acquire`].
    pub fn role(&self) -> Option<CoordinatorRole> {
        self.role
    }

    /// Attempts to acquire the instance lock and fixes the role.
    ///
    /// One-shot: later calls return the role decided by the first call without
    /// touching the lock again.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::MutexAcquisition`] for OS failures unrelated to
    /// contention. Callers treat it as fatal.
    pub fn acquire(&mut self) -> Result<CoordinatorRole, CoordinatorError> {
        if let Some(role) = self.role {
            return Ok(role);
        }

        let role = match InstanceLock::try_acquire(&self.identity)? {
            LockOutcome::Acquired(lock) => {
                self.lock = Some(lock);
                CoordinatorRole::Primary
            }
            LockOutcome::AlreadyHeld => CoordinatorRole::Secondary,
        };

        info!(
            "Running as {role} instance of {}",
            self.identity.mutex_name()
        );

        self.role = Some(role);
        Ok(role)
    }

    /// Starts the activation server. Primary only.
    pub async fn start_server(
        &self,
        sender: ActivationSender,
    ) -> Result<ActivationServerHandle, CoordinatorError> {
        self.expect_role(CoordinatorRole::Primary)?;
        start_activation_server(&self.identity, self.config.read_timeout(), sender).await
    }

    /// Forwards `message` to the Primary. Secondary only.
    pub async fn activate_primary(&self, message: ActivationMessage) -> Result<(), CoordinatorError> {
        self.expect_role(CoordinatorRole::Secondary)?;
        send_activation(&self.identity, message, self.config.connect_timeout()).await
    }

    /// Stops the server (if any) and releases the lock. Teardown faults are logged only.
    pub async fn shutdown(&mut self, server: Option<ActivationServerHandle>) {
        if let Some(server) = server {
            if let Err(e) = server.shutdown(self.config.shutdown_timeout()).await {
                warn!("Activation server teardown failed: {e}");
            }
        }

        if let Some(lock) = self.lock.take() {
            lock.release();
        }
    }

    #[track_caller]
    fn expect_role(&self, expected: CoordinatorRole) -> Result<(), CoordinatorError> {
        match self.role {
            Some(role) if role == expected => Ok(()),
            Some(role) => Err(CoordinatorError::Role {
                message: format!("Operation requires the {expected} role, this process is {role}"),
                location: ErrorLocation::from(Location::caller()),
            }),
            None => Err(CoordinatorError::Role {
                message: format!("Operation requires the {expected} role, no role decided yet"),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
