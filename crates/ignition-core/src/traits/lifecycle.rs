// SPDX-FileCopyrightText: 2026 Ignition Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Startup and shutdown hook traits.
//!
//! Participants are registered explicitly with `{kind, order, await policy}`
//! metadata rather than discovered by attribute scanning; the registration
//! structs here travel with a [`ComponentExport`](crate::types::ComponentExport)
//! from the catalog into the lifecycle registry.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::IgnitionError;
use crate::types::AwaitPolicy;

/// A unit of startup behavior run by the lifecycle orchestrator.
///
/// The cancellation token is threaded through every call; a hook that does
/// long-running work is expected to observe it cooperatively. The
/// orchestrator never forcibly terminates a running hook.
#[async_trait]
pub trait StartupHook: Send + Sync + 'static {
    async fn startup(&self, cancel: CancellationToken) -> Result<(), IgnitionError>;
}

/// A unit of shutdown behavior run by the lifecycle orchestrator.
///
/// Shutdown hooks are always awaited, and a failing hook never prevents
/// later hooks from running.
#[async_trait]
pub trait ShutdownHook: Send + Sync + 'static {
    async fn shutdown(&self, cancel: CancellationToken) -> Result<(), IgnitionError>;
}

/// Startup participation metadata attached to a component export.
#[derive(Clone)]
pub struct StartupRegistration {
    /// Ordering key. Lower runs first; ties break by registration order.
    pub order: i32,
    /// Whether the orchestrator awaits this participant before proceeding.
    pub policy: AwaitPolicy,
    /// The hook to run.
    pub hook: Arc<dyn StartupHook>,
}

impl StartupRegistration {
    pub fn new(order: i32, policy: AwaitPolicy, hook: Arc<dyn StartupHook>) -> Self {
        Self {
            order,
            policy,
            hook,
        }
    }
}

impl std::fmt::Debug for StartupRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StartupRegistration")
            .field("order", &self.order)
            .field("policy", &self.policy)
            .finish()
    }
}

/// Shutdown participation metadata attached to a component export.
///
/// Shutdown has no await policy: every shutdown participant is awaited.
/// Startup and shutdown ordering keys are independent attributes; no
/// reverse-of-startup teardown order is implied.
#[derive(Clone)]
pub struct ShutdownRegistration {
    /// Ordering key. Lower runs first; ties break by registration order.
    pub order: i32,
    /// The hook to run.
    pub hook: Arc<dyn ShutdownHook>,
}

impl ShutdownRegistration {
    pub fn new(order: i32, hook: Arc<dyn ShutdownHook>) -> Self {
        Self { order, hook }
    }
}

impl std::fmt::Debug for ShutdownRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownRegistration")
            .field("order", &self.order)
            .finish()
    }
}
