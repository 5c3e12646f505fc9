use playrandom::app::{LaunchOutcome, run};
use playrandom::logger::initialize as LoggerInitialize;
use playrandom::notify::platform_notifier;
use playrandom::options::LaunchOptions;

use common::{APP_NAME, BINARY_NAME};
use instance_core::args::ParsedArguments;
use instance_core::startup::AutostartEntry;

use std::future::pending;
use std::process::ExitCode;

use log::{error, info, warn};
use tokio::signal::ctrl_c;

#[tokio::main]
async fn main() -> ExitCode {
    let args = ParsedArguments::from_env();

    let options = match LaunchOptions::from_env(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize logger FIRST
    if let Err(e) = LoggerInitialize(&options.log_dir) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    info!("{APP_NAME} starting");
    info!("Log directory: {}", options.log_dir.display());

    let boot = AutostartEntry::for_current_exe().unwrap_or_else(|e| {
        warn!("Falling back to {BINARY_NAME} for boot registration: {e}");
        AutostartEntry::new(BINARY_NAME)
    });

    let notifier = platform_notifier();

    match run(&args, &options, &boot, notifier.as_ref(), wait_for_exit()).await {
        Ok(outcome) => {
            info!("Exiting after {outcome}");
            if outcome == LaunchOutcome::Unreachable {
                warn!("Activation was not delivered");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn wait_for_exit() {
    if let Err(e) = ctrl_c().await {
        error!("Failed to listen for ctrl-c, running until killed: {e}");
        pending::<()>().await;
    }
}
