// SPDX-FileCopyrightText: 2026 Ignition Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Addon entry-point traits.
//!
//! A dynamically loaded addon binary exposes an entry symbol returning an
//! [`AddonModule`]; an in-process source supplies an [`AddonProvider`].
//! Either way the catalog only ever sees a list of component exports.

use crate::error::IgnitionError;
use crate::types::ComponentExport;

/// The object a dynamic addon's entry symbol returns.
///
/// Addon authors implement this in their cdylib and expose it via:
///
/// ```ignore
/// #[unsafe(no_mangle)]
/// pub fn ignition_addon_entry() -> *mut dyn AddonModule {
///     Box::into_raw(Box::new(MyAddon))
/// }
/// ```
pub trait AddonModule: Send + Sync {
    /// Human-readable addon name, used in descriptors and logs.
    fn name(&self) -> &str;

    /// The components this addon contributes to the graph.
    fn exports(&self) -> Vec<ComponentExport>;
}

/// An externally supplied, in-process addon source.
///
/// A failing provider is recorded as a failed descriptor and never aborts
/// the scan, exactly like a broken binary on disk.
pub trait AddonProvider: Send + Sync {
    /// Identifies this provider in descriptors and logs.
    fn origin(&self) -> String;

    /// Produces the components this provider contributes.
    fn provide(&self) -> Result<Vec<ComponentExport>, IgnitionError>;
}
