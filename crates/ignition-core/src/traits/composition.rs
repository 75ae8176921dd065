// SPDX-FileCopyrightText: 2026 Ignition Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The composition-container seam.
//!
//! The bootstrapper and orchestrator depend only on [`CompositionRoot`],
//! never on a concrete container. Any DI library, or the hand-rolled
//! `ComponentGraph` in the `ignition` crate, satisfies it.

use crate::error::IgnitionError;
use crate::types::ComponentInstance;

/// Revocation token returned by [`CompositionRoot::export`].
///
/// Releasing an export requires the token handed out when it was created,
/// so two exports under the same contract can be revoked independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExportToken(pub u64);

/// A target whose declared imports the container fills in one pass.
pub trait ImportSink {
    /// Contract names this sink wants resolved.
    fn imports(&self) -> Vec<String>;

    /// Receives all instances currently exported under `contract`.
    fn accept(&mut self, contract: &str, instances: Vec<ComponentInstance>);
}

/// Narrow interface over the object-graph builder the catalog feeds into.
///
/// Capabilities: resolve one, resolve many, export an externally supplied
/// instance, revoke an export, and fill a sink's declared imports. Mutating
/// operations are serialized internally by implementations so concurrent
/// callers never observe a partial export or release.
pub trait CompositionRoot: Send + Sync {
    /// Exports `instance` under `contract`, returning a revocation token.
    fn export(
        &self,
        contract: &str,
        instance: ComponentInstance,
    ) -> Result<ExportToken, IgnitionError>;

    /// Resolves a single instance of `contract`, or `None` when nothing is
    /// exported under it.
    fn get_export(&self, contract: &str) -> Result<Option<ComponentInstance>, IgnitionError>;

    /// Resolves every instance exported under `contract` (possibly empty).
    fn get_exports(&self, contract: &str) -> Result<Vec<ComponentInstance>, IgnitionError>;

    /// Revokes a prior export. Releasing an already-released token is an
    /// error-free no-op.
    fn release(&self, token: ExportToken) -> Result<(), IgnitionError>;

    /// Resolves every contract the sink declares and hands the instances to it.
    fn fill_imports(&self, sink: &mut dyn ImportSink) -> Result<(), IgnitionError>;
}
