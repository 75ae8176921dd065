// SPDX-FileCopyrightText: 2026 Ignition Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Ignition bootstrap framework.
//!
//! This crate provides the foundational trait definitions, error type, and
//! common types used throughout the Ignition workspace. The catalog,
//! lifecycle orchestrator, and bootstrapper all build on the seams defined
//! here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::IgnitionError;
pub use types::{
    AwaitPolicy, BootstrapState, ComponentExport, ComponentInstance, LoadStatus, ParticipantKind,
};

// Re-export all trait seams at crate root.
pub use traits::{
    AddonModule, AddonProvider, CompositionRoot, ExportToken, ImportSink, ShutdownHook,
    StartupHook,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignition_error_has_all_variants() {
        // Verify all 7 error variants exist and can be constructed.
        let _arg = IgnitionError::InvalidArgument("test".into());
        let _state = IgnitionError::InvalidState {
            operation: "export".into(),
            required: "Initialized".into(),
            actual: "Created".into(),
        };
        let _load = IgnitionError::AddonLoad {
            path: "/tmp/a.so".into(),
            message: "bad magic".into(),
        };
        let _participant = IgnitionError::Participant {
            name: "db".into(),
            source: Box::new(std::io::Error::other("test")),
        };
        let _abort = IgnitionError::StartupAborted("test".into());
        let _config = IgnitionError::Config("test".into());
        let _internal = IgnitionError::Internal("test".into());
    }
}
