//! Named mutual exclusion backed by the OS primitive `single_instance` picks per platform.
//!
//! - Windows: a named kernel mutex, `Global\` prefixed for machine scope.
//! - Linux: an abstract-namespace socket bound under the mutex name.
//! - macOS: an exclusive `flock` on a file in the identity's resource directory.
//!
//! In every case the OS drops the object when the holding process exits or crashes,
//! so a dead Primary never blocks the next launch.

use crate::error::CoordinatorError;
use crate::protocol::InstanceIdentity;

use common::ErrorLocation;

use std::fmt::{Debug, Formatter, Result as FormatResult};
use std::io::Error as IoError;
use std::panic::Location;

use log::{debug, info};
use single_instance::SingleInstance;

/// Outcome of [`InstanceLock::try_acquire`].
#[derive(Debug)]
pub enum LockOutcome {
    /// This caller created the mutex and now holds it.
    Acquired(InstanceLock),
    /// Another process already holds the mutex.
    AlreadyHeld,
}

/// A held instance mutex. Dropping it releases the mutex.
pub struct InstanceLock {
    guard: SingleInstance,
    name: String,
}

impl Debug for InstanceLock {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter
            .debug_struct("InstanceLock")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl InstanceLock {
    /// Attempts to take the mutex named after `identity` without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::MutexAcquisition`] for any failure other than
    /// contention: missing permissions, an invalid name, resource exhaustion.
    #[track_caller]
    pub fn try_acquire(identity: &InstanceIdentity) -> Result<LockOutcome, CoordinatorError> {
        let location = ErrorLocation::from(Location::caller());
        let name = os_mutex_name(identity, &location)?;

        let guard = SingleInstance::new(&name).map_err(|e| CoordinatorError::MutexAcquisition {
            message: format!("Failed to create instance mutex {name}"),
            location,
            source: IoError::other(e),
        })?;

        if !guard.is_single() {
            debug!("Instance mutex {name} is held by another process");
            return Ok(LockOutcome::AlreadyHeld);
        }

        info!("Acquired instance mutex {name}");
        Ok(LockOutcome::Acquired(InstanceLock { guard, name }))
    }

    /// The OS-level name the mutex was created under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Releases the mutex ahead of drop.
    pub fn release(self) {
        let InstanceLock { guard, name } = self;
        drop(guard);
        info!("Released instance mutex {name}");
    }
}

#[cfg(windows)]
fn os_mutex_name(
    identity: &InstanceIdentity,
    _location: &ErrorLocation,
) -> Result<String, CoordinatorError> {
    use crate::protocol::InstanceScope;

    // Unprefixed kernel object names already live in the session namespace.
    Ok(match identity.scope() {
        InstanceScope::Session => identity.mutex_name(),
        InstanceScope::Global => format!("Global\\{}", identity.mutex_name()),
    })
}

#[cfg(target_os = "macos")]
fn os_mutex_name(
    identity: &InstanceIdentity,
    location: &ErrorLocation,
) -> Result<String, CoordinatorError> {
    // The macOS backend locks a file at the given path.
    let path = identity.lock_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CoordinatorError::MutexAcquisition {
            message: format!("Failed to create lock directory {}", parent.display()),
            location: *location,
            source: e,
        })?;
    }
    Ok(path.display().to_string())
}

#[cfg(not(any(windows, target_os = "macos")))]
fn os_mutex_name(
    identity: &InstanceIdentity,
    _location: &ErrorLocation,
) -> Result<String, CoordinatorError> {
    Ok(identity.mutex_name())
}
