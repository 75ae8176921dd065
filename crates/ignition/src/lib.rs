// SPDX-FileCopyrightText: 2026 Ignition Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ignition - an application bootstrap framework.
//!
//! The façade crate ties the pieces together: the addon catalog discovers
//! component exports, the component graph composes them, the lifecycle
//! orchestrator starts and stops them, and the [`Bootstrapper`] sequences
//! it all behind a four-state machine.
//!
//! ```no_run
//! use ignition::{BootstrapOptions, Bootstrapper};
//!
//! # async fn demo() -> Result<(), ignition_core::IgnitionError> {
//! let mut bootstrapper = Bootstrapper::new(
//!     BootstrapOptions::new().with_addon_dir("/usr/lib/myapp/addons"),
//! )?;
//! bootstrapper.configure(vec![])?;
//! bootstrapper.initialize().await?;
//! bootstrapper.run().await?;
//! // ... application is running ...
//! bootstrapper.dispose().await;
//! # Ok(())
//! # }
//! ```

pub mod bootstrap;
pub mod graph;
pub mod run;
pub mod signal;

pub use bootstrap::{BootstrapOptions, Bootstrapper};
pub use graph::ComponentGraph;

// Re-export the building blocks a host embedding the bootstrapper needs.
pub use ignition_catalog::{AddonCatalog, AddonSource};
pub use ignition_core::{
    AwaitPolicy, BootstrapState, ComponentExport, ComponentInstance, IgnitionError, LoadStatus,
};
pub use ignition_lifecycle::{LifecycleRegistry, PhaseOutcome, PhaseReport};
pub use ignition_lock::ResourceMutex;
