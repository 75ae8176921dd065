// SPDX-FileCopyrightText: 2026 Ignition Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Addon discovery and cataloging for the Ignition bootstrap framework.
//!
//! The [`AddonCatalog`] unions discovery sources (directories, explicit
//! binaries, in-process components, external providers), scans them lazily,
//! and records a per-attempt [`AddonDescriptor`] so that one broken addon
//! never blocks the host.

pub mod catalog;
pub mod descriptor;
pub mod loader;
pub mod source;

pub use catalog::AddonCatalog;
pub use descriptor::AddonDescriptor;
pub use loader::{ADDON_ENTRY_SYMBOL, AddonLoader, DynamicLoader, LoadedAddon};
pub use source::AddonSource;
