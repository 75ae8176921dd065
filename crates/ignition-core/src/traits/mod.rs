// SPDX-FileCopyrightText: 2026 Ignition Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams of the bootstrap pipeline.
//!
//! The composition container, lifecycle hooks, and addon entry points are
//! all consumed through these traits, using `#[async_trait]` where dynamic
//! dispatch over async calls is needed.

pub mod addon;
pub mod composition;
pub mod lifecycle;

// Re-export all traits at the traits module level for convenience.
pub use addon::{AddonModule, AddonProvider};
pub use composition::{CompositionRoot, ExportToken, ImportSink};
pub use lifecycle::{ShutdownHook, StartupHook};
