// SPDX-FileCopyrightText: 2026 Ignition Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Ignition bootstrap framework.

use thiserror::Error;

/// The primary error type used across all Ignition crates.
#[derive(Debug, Error)]
pub enum IgnitionError {
    /// A caller supplied an invalid argument (empty identifier, empty
    /// contract name). Raised synchronously, before any work begins.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation was invoked in the wrong bootstrap state.
    #[error("{operation} requires bootstrap state {required}, but the current state is {actual}")]
    InvalidState {
        operation: String,
        required: String,
        actual: String,
    },

    /// A candidate addon binary could not be loaded. Caught inside the
    /// catalog scan and recorded on the descriptor; never escapes a scan.
    #[error("failed to load addon `{path}`: {message}")]
    AddonLoad { path: String, message: String },

    /// A lifecycle participant failed during startup or shutdown.
    #[error("lifecycle participant `{name}` failed: {source}")]
    Participant {
        name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A startup participant intentionally aborted the startup sequence.
    #[error("startup aborted: {0}")]
    StartupAborted(String),

    /// Configuration errors surfaced by the host.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors (panicked background task, poisoned lock).
    #[error("internal error: {0}")]
    Internal(String),
}

impl IgnitionError {
    /// Builds the invalid-state error for an operation that requires a
    /// minimum bootstrap state. Names the operation and both states so the
    /// caller sees the precondition, not a generic crash.
    pub fn invalid_state(
        operation: &str,
        required: crate::types::BootstrapState,
        actual: crate::types::BootstrapState,
    ) -> Self {
        IgnitionError::InvalidState {
            operation: operation.to_string(),
            required: required.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Wraps a participant failure with the participant's registered name.
    pub fn participant(name: &str, source: IgnitionError) -> Self {
        IgnitionError::Participant {
            name: name.to_string(),
            source: Box::new(source),
        }
    }
}
