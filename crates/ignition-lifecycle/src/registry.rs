// SPDX-FileCopyrightText: 2026 Ignition Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Explicit registration of lifecycle participants.
//!
//! Participants are registered with explicit `{kind, order, await policy}`
//! metadata at composition-configuration time. Each registration receives a
//! stable discovery sequence number; freezing the registry sorts both phases
//! once (ordering key, then sequence) into a [`LifecyclePlan`] that is reused
//! for dry inspection and execution alike.

use std::sync::Arc;

use async_trait::async_trait;
use ignition_core::traits::lifecycle::{ShutdownHook, StartupHook};
use ignition_core::{AwaitPolicy, ComponentExport, IgnitionError, ParticipantKind};
use tokio_util::sync::CancellationToken;

/// One registered startup participant.
#[derive(Clone)]
pub struct StartupEntry {
    pub name: String,
    pub kind: ParticipantKind,
    pub order: i32,
    pub policy: AwaitPolicy,
    /// Registration order; the tie-break for equal ordering keys.
    pub sequence: u64,
    pub hook: Arc<dyn StartupHook>,
}

impl std::fmt::Debug for StartupEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StartupEntry")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("order", &self.order)
            .field("policy", &self.policy)
            .field("sequence", &self.sequence)
            .finish()
    }
}

/// One registered shutdown participant. Always awaited; no await policy.
#[derive(Clone)]
pub struct ShutdownEntry {
    pub name: String,
    pub kind: ParticipantKind,
    pub order: i32,
    pub sequence: u64,
    pub hook: Arc<dyn ShutdownHook>,
}

impl std::fmt::Debug for ShutdownEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownEntry")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("order", &self.order)
            .field("sequence", &self.sequence)
            .finish()
    }
}

/// Collects startup/shutdown participants and their ordering metadata.
#[derive(Debug, Default)]
pub struct LifecycleRegistry {
    startup: Vec<StartupEntry>,
    shutdown: Vec<ShutdownEntry>,
    next_sequence: u64,
}

impl LifecycleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an asynchronous startup participant.
    pub fn register_startup(
        &mut self,
        name: &str,
        order: i32,
        policy: AwaitPolicy,
        hook: Arc<dyn StartupHook>,
    ) -> Result<(), IgnitionError> {
        self.push_startup(name, ParticipantKind::AsyncStartup, order, policy, hook)
    }

    /// Registers a synchronous startup participant. Synchronous units are
    /// treated as already-completed awaited units: no suspension, always
    /// `Await` policy.
    pub fn register_sync_startup<F>(
        &mut self,
        name: &str,
        order: i32,
        f: F,
    ) -> Result<(), IgnitionError>
    where
        F: Fn() -> Result<(), IgnitionError> + Send + Sync + 'static,
    {
        self.push_startup(
            name,
            ParticipantKind::SyncStartup,
            order,
            AwaitPolicy::Await,
            Arc::new(SyncStartup(f)),
        )
    }

    /// Registers an asynchronous shutdown participant.
    pub fn register_shutdown(
        &mut self,
        name: &str,
        order: i32,
        hook: Arc<dyn ShutdownHook>,
    ) -> Result<(), IgnitionError> {
        self.push_shutdown(name, ParticipantKind::AsyncShutdown, order, hook)
    }

    /// Registers a synchronous shutdown participant.
    pub fn register_sync_shutdown<F>(
        &mut self,
        name: &str,
        order: i32,
        f: F,
    ) -> Result<(), IgnitionError>
    where
        F: Fn() -> Result<(), IgnitionError> + Send + Sync + 'static,
    {
        self.push_shutdown(
            name,
            ParticipantKind::SyncShutdown,
            order,
            Arc::new(SyncShutdown(f)),
        )
    }

    /// Registers the lifecycle participation a component export declares.
    pub fn register_export(&mut self, export: &ComponentExport) -> Result<(), IgnitionError> {
        if let Some(startup) = &export.startup {
            self.push_startup(
                &export.contract,
                ParticipantKind::AsyncStartup,
                startup.order,
                startup.policy,
                startup.hook.clone(),
            )?;
        }
        if let Some(shutdown) = &export.shutdown {
            self.push_shutdown(
                &export.contract,
                ParticipantKind::AsyncShutdown,
                shutdown.order,
                shutdown.hook.clone(),
            )?;
        }
        Ok(())
    }

    pub fn startup_count(&self) -> usize {
        self.startup.len()
    }

    pub fn shutdown_count(&self) -> usize {
        self.shutdown.len()
    }

    /// Computes the ordered plan for both phases. Sorting happens exactly
    /// once, here; the plan is immutable afterwards.
    pub fn freeze(mut self) -> LifecyclePlan {
        self.startup
            .sort_by_key(|entry| (entry.order, entry.sequence));
        self.shutdown
            .sort_by_key(|entry| (entry.order, entry.sequence));
        LifecyclePlan {
            startup: self.startup,
            shutdown: self.shutdown,
        }
    }

    fn push_startup(
        &mut self,
        name: &str,
        kind: ParticipantKind,
        order: i32,
        policy: AwaitPolicy,
        hook: Arc<dyn StartupHook>,
    ) -> Result<(), IgnitionError> {
        if name.trim().is_empty() {
            return Err(IgnitionError::InvalidArgument(
                "participant name must not be empty".into(),
            ));
        }
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.startup.push(StartupEntry {
            name: name.to_string(),
            kind,
            order,
            policy,
            sequence,
            hook,
        });
        Ok(())
    }

    fn push_shutdown(
        &mut self,
        name: &str,
        kind: ParticipantKind,
        order: i32,
        hook: Arc<dyn ShutdownHook>,
    ) -> Result<(), IgnitionError> {
        if name.trim().is_empty() {
            return Err(IgnitionError::InvalidArgument(
                "participant name must not be empty".into(),
            ));
        }
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.shutdown.push(ShutdownEntry {
            name: name.to_string(),
            kind,
            order,
            sequence,
            hook,
        });
        Ok(())
    }
}

/// The frozen, ordered participant lists for both phases.
///
/// Startup and shutdown orders are independent ascending sequences; no
/// reverse-of-startup teardown is implied.
#[derive(Debug, Default)]
pub struct LifecyclePlan {
    startup: Vec<StartupEntry>,
    shutdown: Vec<ShutdownEntry>,
}

impl LifecyclePlan {
    pub fn startup(&self) -> &[StartupEntry] {
        &self.startup
    }

    pub fn shutdown(&self) -> &[ShutdownEntry] {
        &self.shutdown
    }

    /// Participant names in execution order, for dry inspection.
    pub fn startup_names(&self) -> Vec<&str> {
        self.startup.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn shutdown_names(&self) -> Vec<&str> {
        self.shutdown.iter().map(|e| e.name.as_str()).collect()
    }
}

/// Adapter treating a synchronous closure as an already-completed awaited unit.
struct SyncStartup<F>(F);

#[async_trait]
impl<F> StartupHook for SyncStartup<F>
where
    F: Fn() -> Result<(), IgnitionError> + Send + Sync + 'static,
{
    async fn startup(&self, _cancel: CancellationToken) -> Result<(), IgnitionError> {
        (self.0)()
    }
}

struct SyncShutdown<F>(F);

#[async_trait]
impl<F> ShutdownHook for SyncShutdown<F>
where
    F: Fn() -> Result<(), IgnitionError> + Send + Sync + 'static,
{
    async fn shutdown(&self, _cancel: CancellationToken) -> Result<(), IgnitionError> {
        (self.0)()
    }
}
