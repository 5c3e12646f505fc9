use playrandom::app::{LaunchOutcome, PrimaryApp, forward_to_primary, load_config, run};
use playrandom::notify::Notifier;
use playrandom::options::LaunchOptions;
use playrandom::window::WindowState;

use instance_core::args::ParsedArguments;
use instance_core::config::CoordinatorConfig;
use instance_core::coordinator::{CoordinatorRole, InstanceCoordinator};
use instance_core::error::StartupError;
use instance_core::startup::{LaunchType, StartOnBoot};

use std::fs::write;
use std::future::ready;
use std::sync::Mutex;
use std::time::Duration;

use tempfile::TempDir;
use tokio::time::{sleep as TokioSleep, timeout as TokioTimeout};
use uuid::Uuid;

// ============================================================================
// In-process end-to-end tests: Primary app + Secondary forwarding
// ============================================================================

const STATE_TIMEOUT: Duration = Duration::from_secs(5);

/// Collects notifications instead of showing them.
#[derive(Default)]
struct RecordingNotifier {
    shown: Mutex<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, _title: &str, message: &str) {
        self.shown
            .lock()
            .expect("notifier lock")
            .push(message.to_string());
    }
}

/// Records boot registration requests instead of touching the system.
#[derive(Default)]
struct RecordingBoot {
    requests: Mutex<Vec<bool>>,
}

impl StartOnBoot for RecordingBoot {
    fn set_start_on_boot(&self, enabled: bool) -> Result<(), StartupError> {
        self.requests.lock().expect("boot lock").push(enabled);
        Ok(())
    }

    fn start_on_boot(&self) -> Result<bool, StartupError> {
        Ok(self
            .requests
            .lock()
            .expect("boot lock")
            .last()
            .copied()
            .unwrap_or(false))
    }
}

fn unique_config() -> CoordinatorConfig {
    CoordinatorConfig {
        identifier: format!("test-{}", Uuid::new_v4()),
        ..Default::default()
    }
}

async fn wait_for_state(app: &PrimaryApp, expected: WindowState) -> WindowState {
    let polled = TokioTimeout(STATE_TIMEOUT, async {
        loop {
            let state = app.window().state().await;
            if state == expected {
                return state;
            }
            TokioSleep(Duration::from_millis(10)).await;
        }
    })
    .await;

    match polled {
        Ok(state) => state,
        Err(_) => app.window().state().await,
    }
}

/// **VALUE**: Verifies a second launch brings a hidden Primary window to the front.
///
/// **WHY THIS MATTERS**: This is the user-visible contract of single-instance mode:
/// launching again surfaces the running window instead of opening a new one.
///
/// **BUG THIS CATCHES**: Would catch the server dispatching to a queue nobody drains,
/// or the pump not applying `BringToFront` to the window.
#[tokio::test]
async fn given_hidden_primary_when_secondary_launches_then_window_visible_and_focused() {
    // GIVEN: A Primary started by boot registration (hidden window)
    let config = unique_config();
    let mut primary = InstanceCoordinator::new(config.clone());
    assert_eq!(primary.acquire().expect("acquire"), CoordinatorRole::Primary);

    let app = PrimaryApp::start(primary, LaunchType::SystemStartup).await;
    assert!(app.is_serving());
    assert_eq!(app.window().state().await, WindowState::Hidden);

    // WHEN: A second launch forwards to it
    let mut secondary = InstanceCoordinator::new(config);
    assert_eq!(secondary.acquire().expect("acquire"), CoordinatorRole::Secondary);
    let notifier = RecordingNotifier::default();
    let outcome = forward_to_primary(&secondary, &notifier).await;

    // THEN
    assert_eq!(outcome, LaunchOutcome::Forwarded);
    assert_eq!(wait_for_state(&app, WindowState::FRONT).await, WindowState::FRONT);
    assert!(notifier.shown.lock().expect("notifier lock").is_empty());

    app.shutdown().await;
}

/// **VALUE**: Verifies a minimized window is restored as well.
#[tokio::test]
async fn given_minimized_primary_when_secondary_launches_then_restored() {
    let config = unique_config();
    let mut primary = InstanceCoordinator::new(config.clone());
    primary.acquire().expect("acquire");

    let app = PrimaryApp::start(primary, LaunchType::Manual).await;
    app.window().minimize().await;

    let mut secondary = InstanceCoordinator::new(config);
    secondary.acquire().expect("acquire");
    let outcome = forward_to_primary(&secondary, &RecordingNotifier::default()).await;

    assert_eq!(outcome, LaunchOutcome::Forwarded);
    assert_eq!(wait_for_state(&app, WindowState::FRONT).await, WindowState::FRONT);

    app.shutdown().await;
}

/// **VALUE**: Verifies an unreachable Primary is reported to the user exactly once.
///
/// **WHY THIS MATTERS**: The lock can be held by a Primary whose server is gone
/// (shutting down, or bind failed). The second launch must say so and exit.
///
/// **BUG THIS CATCHES**: Would catch a silent failure or a retry loop.
#[tokio::test]
async fn given_lock_held_without_server_when_secondary_launches_then_user_notified() {
    // GIVEN: Lock held, nothing serving
    let config = CoordinatorConfig {
        connect_timeout_ms: 200,
        ..unique_config()
    };
    let mut holder = InstanceCoordinator::new(config.clone());
    assert_eq!(holder.acquire().expect("acquire"), CoordinatorRole::Primary);

    let mut secondary = InstanceCoordinator::new(config);
    assert_eq!(secondary.acquire().expect("acquire"), CoordinatorRole::Secondary);
    let notifier = RecordingNotifier::default();

    // WHEN
    let outcome = forward_to_primary(&secondary, &notifier).await;

    // THEN
    assert_eq!(outcome, LaunchOutcome::Unreachable);
    let shown = notifier.shown.lock().expect("notifier lock");
    assert_eq!(shown.len(), 1);
    assert!(shown[0].contains("already running"));

    drop(shown);
    holder.shutdown(None).await;
}

/// **VALUE**: Verifies `--instance-id` overrides the configured identifier.
///
/// **BUG THIS CATCHES**: Would catch an override that skips identifier validation.
#[test]
fn given_instance_id_flag_when_config_loaded_then_override_validated() {
    let config_dir = TempDir::new().expect("create temp dir");
    write(
        config_dir.path().join("instance.toml"),
        "identifier = \"from.file\"\nconnect_timeout_ms = 250\n",
    )
    .expect("write config");

    let options = |id: &str| LaunchOptions {
        log_dir: config_dir.path().join("logs"),
        config_dir: config_dir.path().to_path_buf(),
        instance_id: Some(id.to_string()),
    };

    let config = load_config(&options("from.flag")).expect("valid override");
    assert_eq!(config.identifier, "from.flag");
    assert_eq!(config.connect_timeout_ms, 250);

    assert!(load_config(&options("bad/id")).is_err());

    let raw = ["--instance-id", "from.args"];
    let from_args = LaunchOptions::from_args(raw, &ParsedArguments::parse_tokens(raw));
    if let Ok(from_args) = from_args {
        assert_eq!(from_args.instance_id.as_deref(), Some("from.args"));
    }
}

/// **VALUE**: Verifies `--set-startup` is applied even when the config file is broken.
///
/// **WHY THIS MATTERS**: A user turning boot registration off must not be blocked by an
/// unrelated typo in `instance.toml`.
///
/// **BUG THIS CATCHES**: Would catch config loading (and its early return) moving back
/// ahead of the startup toggle.
#[tokio::test]
async fn given_invalid_config_when_set_startup_requested_then_toggle_still_applied() {
    // GIVEN: A config that fails validation
    let config_dir = TempDir::new().expect("create temp dir");
    write(
        config_dir.path().join("instance.toml"),
        "connect_timeout_ms = 0\n",
    )
    .expect("write config");

    let options = LaunchOptions {
        log_dir: config_dir.path().join("logs"),
        config_dir: config_dir.path().to_path_buf(),
        instance_id: Some(format!("test-{}", Uuid::new_v4())),
    };
    let args = ParsedArguments::parse("--set-startup false");
    let boot = RecordingBoot::default();
    let notifier = RecordingNotifier::default();

    // WHEN
    let result = run(&args, &options, &boot, &notifier, ready(())).await;

    // THEN: The launch fails on the config, after the toggle reached the collaborator
    assert!(result.is_err());
    assert_eq!(*boot.requests.lock().expect("boot lock"), vec![false]);
    assert!(notifier.shown.lock().expect("notifier lock").is_empty());
}
