//! Launch flow shared by the binary and the integration tests.
//!
//! ```text
//! parse args → --set-startup → load config → acquire
//!   Primary:   start activation server → window + activation pump → wait → shutdown
//!   Secondary: forward BringToFront → notify on failure → exit
//! ```

use crate::error::PlayRandomError;
use crate::notify::{Notifier, unreachable_message};
use crate::options::LaunchOptions;
use crate::window::{Window, pump_activations};

use common::{APP_NAME, ErrorLocation};
use instance_core::activation::activation_channel;
use instance_core::args::ParsedArguments;
use instance_core::config::CoordinatorConfig;
use instance_core::coordinator::{ActivationServerHandle, CoordinatorRole, InstanceCoordinator};
use instance_core::protocol::ActivationMessage;
use instance_core::startup::{LaunchType, StartOnBoot, apply_startup_flag};

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::future::Future;
use std::panic::Location;

use log::{debug, error, info, warn};
use tokio::spawn as TokioSpawn;
use tokio::task::JoinHandle;

/// How a launch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// Ran as the Primary until asked to exit.
    Primary,
    /// Forwarded the activation to the running instance.
    Forwarded,
    /// Another instance holds the lock but did not answer.
    Unreachable,
}

impl Display for LaunchOutcome {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        match self {
            LaunchOutcome::Primary => formatter.write_str("running as primary"),
            LaunchOutcome::Forwarded => formatter.write_str("forwarding to the running instance"),
            LaunchOutcome::Unreachable => {
                formatter.write_str("failing to reach the running instance")
            }
        }
    }
}

/// Loads `instance.toml` and applies the `--instance-id` override.
///
/// # Errors
///
/// Returns [`PlayRandomError::Startup`] if the config cannot be loaded or the
/// override is not a valid identifier.
#[track_caller]
pub fn load_config(options: &LaunchOptions) -> Result<CoordinatorConfig, PlayRandomError> {
    let location = ErrorLocation::from(Location::caller());

    let mut config =
        CoordinatorConfig::load(&options.config_dir).map_err(|e| PlayRandomError::Startup {
            message: format!("Failed to load config: {e}"),
            location,
        })?;

    if let Some(identifier) = &options.instance_id {
        debug!("Overriding instance identifier with {identifier}");
        config.identifier = identifier.clone();
        config.validate().map_err(|e| PlayRandomError::Startup {
            message: format!("Invalid instance identifier: {e}"),
            location,
        })?;
    }

    Ok(config)
}

/// Runs one launch to completion.
///
/// `exit_signal` resolves when a Primary should shut down; a Secondary never awaits it.
///
/// # Errors
///
/// - [`PlayRandomError::Startup`] - config could not be loaded
/// - [`PlayRandomError::Coordinator`] - the instance lock could not be acquired
pub async fn run<F>(
    args: &ParsedArguments,
    options: &LaunchOptions,
    boot: &dyn StartOnBoot,
    notifier: &dyn Notifier,
    exit_signal: F,
) -> Result<LaunchOutcome, PlayRandomError>
where
    F: Future<Output = ()>,
{
    // Before config and coordination so it also applies on a launch that only
    // forwards or that fails on a broken config.
    apply_startup_flag(args, boot);

    let config = load_config(options)?;

    let mut coordinator = InstanceCoordinator::new(config);
    let role = coordinator
        .acquire()
        .map_err(|e| PlayRandomError::Coordinator {
            message: format!("Failed to acquire the instance lock: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

    match role {
        CoordinatorRole::Secondary => Ok(forward_to_primary(&coordinator, notifier).await),
        CoordinatorRole::Primary => {
            let launch = LaunchType::detect(args, boot);
            let app = PrimaryApp::start(coordinator, launch).await;

            info!("{APP_NAME} is running");
            exit_signal.await;

            app.shutdown().await;
            Ok(LaunchOutcome::Primary)
        }
    }
}

/// Secondary branch: one activation attempt, no retry.
pub async fn forward_to_primary(
    coordinator: &InstanceCoordinator,
    notifier: &dyn Notifier,
) -> LaunchOutcome {
    match coordinator
        .activate_primary(ActivationMessage::BringToFront)
        .await
    {
        Ok(()) => LaunchOutcome::Forwarded,
        Err(e) => {
            error!("Could not reach the running instance: {e}");
            notifier.notify(APP_NAME, &unreachable_message(&e));
            LaunchOutcome::Unreachable
        }
    }
}

/// The running Primary: window, activation server and the pump between them.
#[derive(Debug)]
pub struct PrimaryApp {
    coordinator: InstanceCoordinator,
    window: Window,
    server: Option<ActivationServerHandle>,
    pump: JoinHandle<usize>,
}

impl PrimaryApp {
    /// Starts serving activations for an acquired Primary.
    ///
    /// A failed bind is logged and the application keeps running without the
    /// server; later launches then report the instance as unreachable.
    pub async fn start(coordinator: InstanceCoordinator, launch: LaunchType) -> Self {
        let window = Window::for_launch(launch);
        let (sender, receiver) = activation_channel();

        let server = match coordinator.start_server(sender).await {
            Ok(server) => Some(server),
            Err(e) => {
                error!("Activation server unavailable: {e}");
                None
            }
        };

        let pump = TokioSpawn(pump_activations(receiver, window.clone()));

        Self {
            coordinator,
            window,
            server,
            pump,
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn is_serving(&self) -> bool {
        self.server.as_ref().is_some_and(ActivationServerHandle::is_running)
    }

    /// Stops the server, drains the pump and releases the instance lock.
    pub async fn shutdown(mut self) {
        self.coordinator.shutdown(self.server.take()).await;

        // The server owned the only sender, so the pump ends once it is gone.
        match self.pump.await {
            Ok(applied) => debug!("Activation pump applied {applied} messages"),
            Err(e) => warn!("Activation pump failed: {e}"),
        }

        info!("Window closed in state {}", self.window.state().await);
    }
}
