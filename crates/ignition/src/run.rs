// SPDX-FileCopyrightText: 2026 Ignition Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `ignition run` host loop.
//!
//! Drives a [`Bootstrapper`] through its full life: configure addon sources
//! from the loaded configuration, initialize the composition graph, run the
//! startup phase, then park until a shutdown signal arrives and dispose.

use ignition_config::IgnitionConfig;
use ignition_core::IgnitionError;
use tracing::{error, info, warn};

use crate::bootstrap::{BootstrapOptions, Bootstrapper};
use crate::signal::install_signal_handler;

/// Process exit code when another instance already holds the mutex.
pub const EXIT_ALREADY_RUNNING: i32 = 2;
/// Process exit code when the startup phase failed.
pub const EXIT_STARTUP_FAILED: i32 = 1;

/// Runs the host until a shutdown signal. Returns the process exit code.
pub async fn run_host(config: IgnitionConfig) -> Result<i32, IgnitionError> {
    init_tracing(&config.host.log_level);

    info!(host = config.host.name.as_str(), "starting ignition host");

    let wants_mutex = config.instance.mutex_id.is_some();
    let mut bootstrapper = Bootstrapper::new(BootstrapOptions::from_config(&config))?;

    // Single-instance policy: losing the mutex race is not an error, but
    // this host chooses to step aside.
    if wants_mutex && !bootstrapper.is_mutex_locked() {
        warn!("another instance is already running, exiting");
        return Ok(EXIT_ALREADY_RUNNING);
    }

    bootstrapper.configure(vec![])?;
    if !bootstrapper.initialize().await? {
        warn!("some addon exports could not be applied, continuing");
    }

    if !bootstrapper.run().await? {
        if let Some(report) = bootstrapper.startup_report() {
            for failure in &report.failures {
                error!(
                    participant = failure.name.as_str(),
                    error = %failure.error,
                    "startup participant failed"
                );
            }
        }
        bootstrapper.dispose().await;
        return Ok(EXIT_STARTUP_FAILED);
    }

    install_signal_handler(bootstrapper.cancellation_token());
    bootstrapper.cancellation_token().cancelled().await;

    info!("shutting down");
    bootstrapper.dispose().await;
    Ok(0)
}

/// Initializes the tracing subscriber with the given log level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ignition={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
