//! Headless stand-in for the main window.
//!
//! Tracks the visibility the real window would have and applies activation
//! messages to it. All mutation happens in the UI context that drains the
//! activation queue ([`pump_activations`]); the activation server never touches it.

use instance_core::activation::ActivationReceiver;
use instance_core::protocol::ActivationMessage;
use instance_core::startup::LaunchType;

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::sync::Arc;

use log::{debug, info};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Hidden,
    Minimized,
    Visible { focused: bool },
}

impl WindowState {
    /// Visible and holding the foreground.
    pub const FRONT: WindowState = WindowState::Visible { focused: true };
}

impl Display for WindowState {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        match self {
            WindowState::Hidden => formatter.write_str("hidden"),
            WindowState::Minimized => formatter.write_str("minimized"),
            WindowState::Visible { focused: true } => formatter.write_str("visible (focused)"),
            WindowState::Visible { focused: false } => formatter.write_str("visible"),
        }
    }
}

/// Shared handle to the window state. Clones refer to the same window.
#[derive(Debug, Clone)]
pub struct Window {
    state: Arc<RwLock<WindowState>>,
}

impl Window {
    pub fn new(initial: WindowState) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial)),
        }
    }

    /// A launch by boot registration starts in the background.
    pub fn for_launch(launch: LaunchType) -> Self {
        let initial = match launch {
            LaunchType::SystemStartup => WindowState::Hidden,
            LaunchType::Manual | LaunchType::UserStartup => WindowState::FRONT,
        };
        debug!("Creating window for {launch:?} launch, initially {initial}");
        Self::new(initial)
    }

    pub async fn state(&self) -> WindowState {
        *self.state.read().await
    }

    /// Shows, restores and focuses the window.
    pub async fn bring_to_front(&self) {
        let mut state = self.state.write().await;
        let previous = *state;
        *state = WindowState::FRONT;
        info!("Window brought to front (was {previous})");
    }

    pub async fn minimize(&self) {
        *self.state.write().await = WindowState::Minimized;
    }

    pub async fn hide(&self) {
        *self.state.write().await = WindowState::Hidden;
    }

    /// Another application took the foreground.
    pub async fn blur(&self) {
        let mut state = self.state.write().await;
        if let WindowState::Visible { focused } = &mut *state {
            *focused = false;
        }
    }

    pub async fn apply(&self, message: ActivationMessage) {
        match message {
            ActivationMessage::BringToFront => self.bring_to_front().await,
        }
    }
}

/// Applies queued activations to `window` until the queue closes.
///
/// Returns the number of messages applied.
pub async fn pump_activations(mut receiver: ActivationReceiver, window: Window) -> usize {
    let mut applied = 0;

    while let Some(message) = receiver.recv().await {
        debug!("Applying activation message {message}");
        window.apply(message).await;
        applied += 1;
    }

    debug!("Activation queue closed after {applied} messages");
    applied
}
