// SPDX-FileCopyrightText: 2026 Ignition Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Binary loading behind a trait, with the `libloading`-backed production
//! implementation.
//!
//! A loader's only job is to turn a path into a loaded addon or a single
//! error; outcome classification (loaded / rejected-empty / failed) and
//! failure isolation live in the catalog.

use std::path::Path;

use ignition_core::traits::AddonModule;
use ignition_core::{ComponentExport, IgnitionError};
use tracing::debug;

/// Entry symbol every dynamic addon exposes.
pub const ADDON_ENTRY_SYMBOL: &[u8] = b"ignition_addon_entry";

/// Signature of the entry symbol.
type AddonEntryFn = unsafe fn() -> *mut dyn AddonModule;

/// A successfully loaded addon, before outcome classification.
pub struct LoadedAddon {
    /// Self-reported addon name.
    pub name: String,
    /// The components the addon contributes.
    pub exports: Vec<ComponentExport>,
    /// The mapped library, when loaded from a binary. The catalog retains
    /// this for its own lifetime so exported instances stay valid.
    pub library: Option<libloading::Library>,
}

impl std::fmt::Debug for LoadedAddon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedAddon")
            .field("name", &self.name)
            .field("exports", &self.exports.len())
            .field("library", &self.library.is_some())
            .finish()
    }
}

/// Turns a candidate path into a loaded addon.
///
/// Tests substitute in-process implementations; production uses
/// [`DynamicLoader`].
pub trait AddonLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<LoadedAddon, IgnitionError>;
}

/// Loads addons as dynamic libraries via the `ignition_addon_entry` symbol.
#[derive(Debug, Default)]
pub struct DynamicLoader;

impl AddonLoader for DynamicLoader {
    fn load(&self, path: &Path) -> Result<LoadedAddon, IgnitionError> {
        let load_error = |message: String| IgnitionError::AddonLoad {
            path: path.display().to_string(),
            message,
        };

        // SAFETY: loading a library runs its initializers; the addon contract
        // (entry symbol returning a boxed AddonModule) is the trust boundary.
        let library = unsafe { libloading::Library::new(path) }
            .map_err(|e| load_error(format!("cannot map library: {e}")))?;

        let module: Box<dyn AddonModule> = unsafe {
            let entry: libloading::Symbol<AddonEntryFn> = library
                .get(ADDON_ENTRY_SYMBOL)
                .map_err(|e| load_error(format!("missing entry symbol: {e}")))?;
            let raw = entry();
            if raw.is_null() {
                return Err(load_error("entry symbol returned null".into()));
            }
            Box::from_raw(raw)
        };

        let name = module.name().to_string();
        let exports = module.exports();
        debug!(
            path = %path.display(),
            name = name.as_str(),
            exports = exports.len(),
            "dynamic addon loaded"
        );

        Ok(LoadedAddon {
            name,
            exports,
            library: Some(library),
        })
    }
}
