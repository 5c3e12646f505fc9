//! User-facing notifications.

use common::APP_NAME;
use instance_core::error::CoordinatorError;

use std::io::{Write, stderr};

use log::{debug, warn};
use rfd::{MessageButtons, MessageDialog, MessageLevel};

#[cfg(all(unix, not(target_os = "macos")))]
const DISPLAY_VARS: [&str; 2] = ["DISPLAY", "WAYLAND_DISPLAY"];

/// Shows a message to the user and returns once it has been acknowledged.
pub trait Notifier {
    fn notify(&self, title: &str, message: &str);
}

/// Native modal message box. Blocks until the user dismisses it.
#[derive(Debug, Default, Clone, Copy)]
pub struct DialogNotifier;

impl Notifier for DialogNotifier {
    fn notify(&self, title: &str, message: &str) {
        let result = MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();

        debug!("Notification '{title}' dismissed: {result:?}");
    }
}

/// Writes notifications to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, title: &str, message: &str) {
        let mut err = stderr().lock();
        if let Err(e) = writeln!(err, "{title}: {message}").and_then(|()| err.flush()) {
            warn!("Failed to show notification '{title}': {e}");
        }
    }
}

/// Whether this process can show a native dialog.
///
/// Windows and macOS always have a desktop session for a user process. Elsewhere a
/// display server has to be advertised in the environment.
pub fn has_desktop_session() -> bool {
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        DISPLAY_VARS
            .iter()
            .any(|name| std::env::var_os(name).is_some_and(|value| !value.is_empty()))
    }

    #[cfg(not(all(unix, not(target_os = "macos"))))]
    {
        true
    }
}

/// The dialog when a desktop session is available, stderr otherwise.
pub fn platform_notifier() -> Box<dyn Notifier> {
    if has_desktop_session() {
        Box::new(DialogNotifier)
    } else {
        debug!("No desktop session, notifications go to stderr");
        Box::new(ConsoleNotifier)
    }
}

/// Text shown when a second launch cannot reach the running instance.
pub fn unreachable_message(error: &CoordinatorError) -> String {
    format!(
        "Another instance of {APP_NAME} is already running but could not be reached. \
         Close it and try again. ({error})"
    )
}
