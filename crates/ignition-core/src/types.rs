// SPDX-FileCopyrightText: 2026 Ignition Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the Ignition bootstrap pipeline.

use std::any::Any;
use std::sync::Arc;

use strum::{Display, EnumString};

use crate::traits::lifecycle::{StartupRegistration, ShutdownRegistration};

/// The bootstrapper's lifecycle state.
///
/// Transitions are strictly forward-moving, except that `Disposed` is
/// reachable from any state and disposing twice is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum BootstrapState {
    Created,
    Configured,
    Initialized,
    Running,
    Disposed,
}

/// Identifies what kind of lifecycle behavior a participant contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum ParticipantKind {
    SyncStartup,
    AsyncStartup,
    SyncShutdown,
    AsyncShutdown,
}

/// Whether the orchestrator blocks on a startup participant's completion
/// before launching the next one.
///
/// Startup-only: shutdown participants are always awaited so teardown
/// is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum AwaitPolicy {
    Await,
    FireAndForget,
}

/// Outcome of attempting to load one candidate addon binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum LoadStatus {
    /// Loaded and exposing at least one usable component.
    Loaded,
    /// Loaded cleanly but exposing zero usable components. Not an error.
    RejectedEmpty,
    /// The load itself failed. Recorded, never fatal to the scan.
    Failed,
}

/// An opaque component instance handle, resolvable from the composition
/// root by contract name and downcast by the consumer.
pub type ComponentInstance = Arc<dyn Any + Send + Sync>;

/// One component contributed by an addon: a contract name, the instance
/// satisfying it, and optional lifecycle registrations carrying explicit
/// ordering/await metadata.
#[derive(Clone)]
pub struct ComponentExport {
    /// Contract name the instance is exported under.
    pub contract: String,
    /// The exported instance.
    pub instance: ComponentInstance,
    /// Startup participation, if the component has startup behavior.
    pub startup: Option<StartupRegistration>,
    /// Shutdown participation, if the component has shutdown behavior.
    pub shutdown: Option<ShutdownRegistration>,
}

impl ComponentExport {
    /// Creates an export with no lifecycle participation.
    pub fn new(contract: impl Into<String>, instance: ComponentInstance) -> Self {
        Self {
            contract: contract.into(),
            instance,
            startup: None,
            shutdown: None,
        }
    }

    /// Attaches a startup registration.
    pub fn with_startup(mut self, registration: StartupRegistration) -> Self {
        self.startup = Some(registration);
        self
    }

    /// Attaches a shutdown registration.
    pub fn with_shutdown(mut self, registration: ShutdownRegistration) -> Self {
        self.shutdown = Some(registration);
        self
    }
}

impl std::fmt::Debug for ComponentExport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentExport")
            .field("contract", &self.contract)
            .field("startup", &self.startup.is_some())
            .field("shutdown", &self.shutdown.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn bootstrap_state_has_five_variants() {
        let variants = [
            BootstrapState::Created,
            BootstrapState::Configured,
            BootstrapState::Initialized,
            BootstrapState::Running,
            BootstrapState::Disposed,
        ];
        assert_eq!(variants.len(), 5);

        // Display and FromStr round-trip for all variants.
        for variant in &variants {
            let s = variant.to_string();
            let parsed = BootstrapState::from_str(&s).expect("should parse back");
            assert_eq!(*variant, parsed);
        }
    }

    #[test]
    fn load_status_display_round_trips() {
        for variant in [
            LoadStatus::Loaded,
            LoadStatus::RejectedEmpty,
            LoadStatus::Failed,
        ] {
            let parsed = LoadStatus::from_str(&variant.to_string()).unwrap();
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn component_export_defaults_to_no_lifecycle() {
        let export = ComponentExport::new("svc.clock", Arc::new(42u32));
        assert_eq!(export.contract, "svc.clock");
        assert!(export.startup.is_none());
        assert!(export.shutdown.is_none());
    }
}
