// SPDX-FileCopyrightText: 2026 Ignition Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered execution of the frozen lifecycle plan.
//!
//! Startup: awaited participants strictly serialize in plan order; a failing
//! awaited participant is fatal and stops all later launches. Fire-and-forget
//! participants are spawned in plan order and the orchestrator moves on, but
//! every join handle is drained before the phase reports its result, so no
//! outcome is dropped. Shutdown: every participant is awaited and failures
//! are isolated -- teardown always reaches the last participant.

use ignition_core::{AwaitPolicy, IgnitionError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::registry::LifecyclePlan;

/// Terminal state of one orchestration phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOutcome {
    /// Every dispatched participant succeeded.
    Completed,
    /// At least one participant failed.
    Failed,
    /// Cancellation skipped at least one participant.
    Cancelled,
}

/// One participant's recorded failure.
#[derive(Debug)]
pub struct ParticipantFailure {
    pub name: String,
    pub error: IgnitionError,
}

/// What a phase did: how many participants were launched or skipped, and
/// every failure observed, including drained fire-and-forget outcomes.
#[derive(Debug)]
pub struct PhaseReport {
    pub outcome: PhaseOutcome,
    pub launched: usize,
    pub skipped: usize,
    pub failures: Vec<ParticipantFailure>,
}

impl PhaseReport {
    /// True only for a fully clean phase.
    pub fn succeeded(&self) -> bool {
        self.outcome == PhaseOutcome::Completed && self.failures.is_empty()
    }
}

/// Runs the startup phase of the plan.
///
/// Returns once every awaited participant has completed (or one has failed)
/// *and* all fire-and-forget work has been drained.
pub async fn run_startup(plan: &LifecyclePlan, cancel: CancellationToken) -> PhaseReport {
    let mut launched = 0usize;
    let mut skipped = 0usize;
    let mut failures = Vec::new();
    let mut fatal = false;
    let mut cancelled = false;
    let mut in_flight: Vec<(String, JoinHandle<Result<(), IgnitionError>>)> = Vec::new();

    for entry in plan.startup() {
        if cancel.is_cancelled() {
            cancelled = true;
        }
        if cancelled || fatal {
            debug!(
                participant = entry.name.as_str(),
                reason = if cancelled { "cancelled" } else { "fatal failure" },
                "skipping startup participant"
            );
            skipped += 1;
            continue;
        }

        match entry.policy {
            AwaitPolicy::Await => {
                debug!(
                    participant = entry.name.as_str(),
                    order = entry.order,
                    "awaiting startup participant"
                );
                launched += 1;
                match entry.hook.startup(cancel.clone()).await {
                    Ok(()) => {
                        debug!(participant = entry.name.as_str(), "startup participant completed");
                    }
                    Err(e) => {
                        error!(
                            participant = entry.name.as_str(),
                            error = %e,
                            "awaited startup participant failed, aborting startup"
                        );
                        failures.push(ParticipantFailure {
                            name: entry.name.clone(),
                            error: e,
                        });
                        fatal = true;
                    }
                }
            }
            AwaitPolicy::FireAndForget => {
                debug!(
                    participant = entry.name.as_str(),
                    order = entry.order,
                    "launching fire-and-forget startup participant"
                );
                launched += 1;
                let hook = entry.hook.clone();
                let token = cancel.clone();
                in_flight.push((
                    entry.name.clone(),
                    tokio::spawn(async move { hook.startup(token).await }),
                ));
            }
        }
    }

    // Drain fire-and-forget outcomes. Dispatch has ended, but the phase only
    // reports after all in-flight work is observed.
    for (name, handle) in in_flight {
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(
                    participant = name.as_str(),
                    error = %e,
                    "fire-and-forget startup participant failed"
                );
                failures.push(ParticipantFailure { name, error: e });
            }
            Err(join_err) => {
                warn!(
                    participant = name.as_str(),
                    error = %join_err,
                    "fire-and-forget startup participant panicked"
                );
                failures.push(ParticipantFailure {
                    name,
                    error: IgnitionError::Internal(format!(
                        "fire-and-forget participant panicked: {join_err}"
                    )),
                });
            }
        }
    }

    let outcome = if cancelled {
        PhaseOutcome::Cancelled
    } else if !failures.is_empty() {
        PhaseOutcome::Failed
    } else {
        PhaseOutcome::Completed
    };

    info!(
        launched,
        skipped,
        failures = failures.len(),
        outcome = ?outcome,
        "startup phase finished"
    );

    PhaseReport {
        outcome,
        launched,
        skipped,
        failures,
    }
}

/// Runs the shutdown phase of the plan.
///
/// Every participant is awaited; a failure is recorded and the orchestrator
/// proceeds unconditionally so resources owned by later participants are
/// still released. Only cancellation skips participants.
pub async fn run_shutdown(plan: &LifecyclePlan, cancel: CancellationToken) -> PhaseReport {
    let mut launched = 0usize;
    let mut skipped = 0usize;
    let mut failures = Vec::new();
    let mut cancelled = false;

    for entry in plan.shutdown() {
        if cancel.is_cancelled() {
            cancelled = true;
        }
        if cancelled {
            debug!(
                participant = entry.name.as_str(),
                "skipping shutdown participant, cancelled"
            );
            skipped += 1;
            continue;
        }

        debug!(
            participant = entry.name.as_str(),
            order = entry.order,
            "awaiting shutdown participant"
        );
        launched += 1;
        if let Err(e) = entry.hook.shutdown(cancel.clone()).await {
            error!(
                participant = entry.name.as_str(),
                error = %e,
                "shutdown participant failed, continuing teardown"
            );
            failures.push(ParticipantFailure {
                name: entry.name.clone(),
                error: e,
            });
        }
    }

    let outcome = if cancelled {
        PhaseOutcome::Cancelled
    } else if !failures.is_empty() {
        PhaseOutcome::Failed
    } else {
        PhaseOutcome::Completed
    };

    info!(
        launched,
        skipped,
        failures = failures.len(),
        outcome = ?outcome,
        "shutdown phase finished"
    );

    PhaseReport {
        outcome,
        launched,
        skipped,
        failures,
    }
}
