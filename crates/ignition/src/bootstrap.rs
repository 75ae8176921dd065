// SPDX-FileCopyrightText: 2026 Ignition Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The application bootstrapper: a small state machine sequencing
//! catalog scan -> graph build -> lifecycle startup -> teardown.
//!
//! States move strictly forward (Created -> Configured -> Initialized ->
//! Running), except `Disposed`, which is reachable from anywhere and
//! idempotent. Graph operations are gated on `Initialized`; invoked earlier
//! they fail with an invalid-state error naming the precondition. Catalog
//! and plugin problems never surface as errors from `initialize`/`run` --
//! those return success booleans -- only programmer errors do.

use std::path::PathBuf;
use std::sync::Arc;

use ignition_catalog::{AddonCatalog, AddonLoader, AddonSource};
use ignition_config::IgnitionConfig;
use ignition_core::traits::composition::{CompositionRoot, ExportToken, ImportSink};
use ignition_core::{BootstrapState, ComponentInstance, IgnitionError};
use ignition_lifecycle::{LifecyclePlan, LifecycleRegistry, PhaseReport};
use ignition_lock::ResourceMutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::graph::ComponentGraph;

/// Construction parameters for a [`Bootstrapper`].
#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    /// Directories registered as default addon sources during `configure`.
    pub addon_dirs: Vec<PathBuf>,
    /// Filename pattern for the default sources. `None` means the platform
    /// dynamic-library extension.
    pub addon_pattern: Option<String>,
    /// Optional systemwide mutex identifier. When present, the bootstrapper
    /// acquires the resource mutex during construction.
    pub mutex_id: Option<String>,
    /// Owner label recorded in the lock file while the mutex is held.
    pub owner_label: String,
}

impl BootstrapOptions {
    pub fn new() -> Self {
        Self {
            addon_dirs: Vec::new(),
            addon_pattern: None,
            mutex_id: None,
            owner_label: "ignition".to_string(),
        }
    }

    /// Options derived from a loaded configuration.
    pub fn from_config(config: &IgnitionConfig) -> Self {
        let owner_label = config
            .instance
            .owner_label
            .clone()
            .filter(|label| !label.trim().is_empty())
            .unwrap_or_else(|| config.host.name.clone());
        Self {
            addon_dirs: config.addons.dirs.iter().map(PathBuf::from).collect(),
            addon_pattern: config.addons.pattern.clone(),
            mutex_id: config.instance.mutex_id.clone(),
            owner_label,
        }
    }

    pub fn with_mutex_id(mut self, mutex_id: impl Into<String>) -> Self {
        self.mutex_id = Some(mutex_id.into());
        self
    }

    pub fn with_addon_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.addon_dirs.push(dir.into());
        self
    }
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// The bootstrap façade: Configure -> Initialize -> Run -> Dispose.
pub struct Bootstrapper {
    state: BootstrapState,
    options: BootstrapOptions,
    catalog: AddonCatalog,
    registry: LifecycleRegistry,
    plan: Option<LifecyclePlan>,
    graph: Arc<ComponentGraph>,
    mutex: Option<ResourceMutex>,
    cancel: CancellationToken,
    startup_report: Option<PhaseReport>,
    shutdown_report: Option<PhaseReport>,
}

impl Bootstrapper {
    /// Creates a bootstrapper in the `Created` state, using the production
    /// dynamic-library loader.
    ///
    /// When `options.mutex_id` is set, the resource mutex is acquired here;
    /// losing the race is not an error -- check
    /// [`is_mutex_locked`](Bootstrapper::is_mutex_locked) and exit
    /// voluntarily for strict single-instance behavior.
    pub fn new(options: BootstrapOptions) -> Result<Self, IgnitionError> {
        Self::with_catalog(options, AddonCatalog::new())
    }

    /// Creates a bootstrapper whose catalog uses a caller-supplied loader.
    pub fn with_loader(
        options: BootstrapOptions,
        loader: Arc<dyn AddonLoader>,
    ) -> Result<Self, IgnitionError> {
        Self::with_catalog(options, AddonCatalog::with_loader(loader))
    }

    fn with_catalog(options: BootstrapOptions, catalog: AddonCatalog) -> Result<Self, IgnitionError> {
        let mutex = match &options.mutex_id {
            Some(id) => {
                let mutex = ResourceMutex::acquire(id, &options.owner_label)?;
                if !mutex.is_locked() {
                    warn!(
                        identifier = id.as_str(),
                        "resource mutex not acquired, another instance holds it"
                    );
                }
                Some(mutex)
            }
            None => None,
        };

        Ok(Self {
            state: BootstrapState::Created,
            options,
            catalog,
            registry: LifecycleRegistry::new(),
            plan: None,
            graph: Arc::new(ComponentGraph::new()),
            mutex,
            cancel: CancellationToken::new(),
            startup_report: None,
            shutdown_report: None,
        })
    }

    pub fn state(&self) -> BootstrapState {
        self.state
    }

    /// Whether the construction-time resource mutex is held. `false` both
    /// when no mutex was requested and when the acquire lost.
    pub fn is_mutex_locked(&self) -> bool {
        self.mutex.as_ref().is_some_and(|m| m.is_locked())
    }

    /// Token threaded through every lifecycle participant. Cancelling it
    /// skips participants that have not started and is observed
    /// cooperatively by those already running.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// The shared composition root.
    pub fn graph(&self) -> Arc<ComponentGraph> {
        self.graph.clone()
    }

    /// Report of the most recent startup phase, if `run` was invoked.
    pub fn startup_report(&self) -> Option<&PhaseReport> {
        self.startup_report.as_ref()
    }

    /// Report of the shutdown phase, if `dispose` ran one.
    pub fn shutdown_report(&self) -> Option<&PhaseReport> {
        self.shutdown_report.as_ref()
    }

    /// Mutable access to the lifecycle registry for explicit participant
    /// registration. Valid until `initialize` freezes the plan.
    pub fn lifecycle(&mut self) -> Result<&mut LifecycleRegistry, IgnitionError> {
        match self.state {
            BootstrapState::Created | BootstrapState::Configured => Ok(&mut self.registry),
            actual => Err(IgnitionError::InvalidState {
                operation: "lifecycle registration".to_string(),
                required: format!(
                    "{} or {}",
                    BootstrapState::Created,
                    BootstrapState::Configured
                ),
                actual: actual.to_string(),
            }),
        }
    }

    /// Registers the default (options-derived) addon sources plus the
    /// caller's. Created -> Configured.
    pub fn configure(&mut self, sources: Vec<AddonSource>) -> Result<(), IgnitionError> {
        self.require_state("configure", BootstrapState::Created)?;

        let pattern = self
            .options
            .addon_pattern
            .clone()
            .unwrap_or_else(AddonSource::default_pattern);
        for dir in self.options.addon_dirs.clone() {
            self.catalog
                .add(AddonSource::directory_with_pattern(dir, pattern.clone())?);
        }
        for source in sources {
            self.catalog.add(source);
        }

        info!(sources = self.catalog.source_count(), "bootstrapper configured");
        self.state = BootstrapState::Configured;
        Ok(())
    }

    /// Scans the catalog and builds the composition root from it, then
    /// freezes the lifecycle plan. Configured -> Initialized.
    ///
    /// Catalog and plugin problems are per-file descriptors, never errors
    /// here; the boolean is `false` only when a discovered export could not
    /// be applied to the graph.
    pub async fn initialize(&mut self) -> Result<bool, IgnitionError> {
        self.require_state("initialize", BootstrapState::Configured)?;

        self.catalog.scan();
        let exports = self.catalog.exports();
        let discovered = self.catalog.known_files().len();
        let loaded = self.catalog.loaded().len();
        let failed = self.catalog.failures().len();
        info!(discovered, loaded, failed, "catalog scan complete");

        let mut ok = true;
        for export in &exports {
            if let Err(e) = self.graph.export(&export.contract, export.instance.clone()) {
                error!(
                    contract = export.contract.as_str(),
                    error = %e,
                    "could not apply addon export to the graph"
                );
                ok = false;
                continue;
            }
            self.registry.register_export(export)?;
        }

        let registry = std::mem::take(&mut self.registry);
        let plan = registry.freeze();
        debug!(
            startup = plan.startup().len(),
            shutdown = plan.shutdown().len(),
            "lifecycle plan frozen"
        );
        self.plan = Some(plan);

        self.state = BootstrapState::Initialized;
        Ok(ok)
    }

    /// Runs the startup phase. Initialized -> Running on success; on a fatal
    /// startup failure the state stays Initialized and `Ok(false)` is
    /// returned.
    pub async fn run(&mut self) -> Result<bool, IgnitionError> {
        self.require_state("run", BootstrapState::Initialized)?;

        let plan = self
            .plan
            .as_ref()
            .ok_or_else(|| IgnitionError::Internal("lifecycle plan missing after initialize".into()))?;
        let report = ignition_lifecycle::run_startup(plan, self.cancel.clone()).await;
        let succeeded = report.succeeded();
        self.startup_report = Some(report);

        if succeeded {
            self.state = BootstrapState::Running;
            info!("application running");
        } else {
            warn!("startup failed, staying out of the Running state");
        }
        Ok(succeeded)
    }

    /// Runs the shutdown phase best-effort, releases the resource mutex if
    /// held, and clears the graph. Reachable from any state; idempotent.
    pub async fn dispose(&mut self) {
        if self.state == BootstrapState::Disposed {
            return;
        }

        if let Some(plan) = &self.plan {
            // A cancelled startup must not cancel teardown: shutdown gets
            // its own token.
            let report = ignition_lifecycle::run_shutdown(plan, CancellationToken::new()).await;
            for failure in &report.failures {
                error!(
                    participant = failure.name.as_str(),
                    error = %failure.error,
                    "shutdown participant failed during dispose"
                );
            }
            self.shutdown_report = Some(report);
        }

        if let Some(mutex) = &mut self.mutex {
            mutex.release();
        }
        self.graph.clear();
        self.plan = None;

        info!("bootstrapper disposed");
        self.state = BootstrapState::Disposed;
    }

    // --- Graph operations, valid once Initialized has been reached ---

    /// Exports an externally supplied instance into the graph.
    pub fn export(
        &self,
        contract: &str,
        instance: ComponentInstance,
    ) -> Result<ExportToken, IgnitionError> {
        Self::check_contract(contract)?;
        self.require_initialized("export")?;
        self.graph.export(contract, instance)
    }

    /// Resolves a single instance of `contract`.
    pub fn get_export(&self, contract: &str) -> Result<Option<ComponentInstance>, IgnitionError> {
        Self::check_contract(contract)?;
        self.require_initialized("get_export")?;
        self.graph.get_export(contract)
    }

    /// Resolves every instance exported under `contract`.
    pub fn get_exports(&self, contract: &str) -> Result<Vec<ComponentInstance>, IgnitionError> {
        Self::check_contract(contract)?;
        self.require_initialized("get_exports")?;
        self.graph.get_exports(contract)
    }

    /// Revokes a prior export.
    pub fn release(&self, token: ExportToken) -> Result<(), IgnitionError> {
        self.require_initialized("release")?;
        self.graph.release(token)
    }

    /// Resolves every contract the sink declares and hands the instances over.
    pub fn fill_imports(&self, sink: &mut dyn ImportSink) -> Result<(), IgnitionError> {
        self.require_initialized("fill_imports")?;
        self.graph.fill_imports(sink)
    }

    fn check_contract(contract: &str) -> Result<(), IgnitionError> {
        if contract.trim().is_empty() {
            return Err(IgnitionError::InvalidArgument(
                "contract name must not be empty".into(),
            ));
        }
        Ok(())
    }

    fn require_state(&self, operation: &str, required: BootstrapState) -> Result<(), IgnitionError> {
        if self.state == required {
            Ok(())
        } else {
            Err(IgnitionError::invalid_state(operation, required, self.state))
        }
    }

    fn require_initialized(&self, operation: &str) -> Result<(), IgnitionError> {
        match self.state {
            BootstrapState::Initialized | BootstrapState::Running => Ok(()),
            actual => Err(IgnitionError::invalid_state(
                operation,
                BootstrapState::Initialized,
                actual,
            )),
        }
    }
}

impl std::fmt::Debug for Bootstrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bootstrapper")
            .field("state", &self.state)
            .field("mutex_locked", &self.is_mutex_locked())
            .field("plan_frozen", &self.plan.is_some())
            .finish()
    }
}
