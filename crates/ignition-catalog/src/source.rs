// SPDX-FileCopyrightText: 2026 Ignition Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Discovery origins the catalog unions together.

use std::path::PathBuf;
use std::sync::Arc;

use ignition_core::traits::AddonProvider;
use ignition_core::{ComponentExport, IgnitionError};

/// One discovery origin. Multiple sources compose into one logical catalog
/// with union semantics; duplicates by identity are harmless.
#[derive(Clone)]
pub enum AddonSource {
    /// A directory scanned recursively for files matching a filename pattern.
    /// A directory that does not exist is silently skipped at scan time.
    Directory { path: PathBuf, pattern: String },
    /// One explicit candidate binary.
    Binary(PathBuf),
    /// One explicit in-process component.
    Component(ComponentExport),
    /// An externally supplied provider of components.
    Provider(Arc<dyn AddonProvider>),
}

impl AddonSource {
    /// The default filename pattern: the platform dynamic-library extension
    /// (`*.so`, `*.dylib`, or `*.dll`).
    pub fn default_pattern() -> String {
        format!("*.{}", std::env::consts::DLL_EXTENSION)
    }

    /// Directory source with the default pattern.
    pub fn directory(path: impl Into<PathBuf>) -> Result<Self, IgnitionError> {
        Self::directory_with_pattern(path, Self::default_pattern())
    }

    /// Directory source with an explicit filename pattern.
    pub fn directory_with_pattern(
        path: impl Into<PathBuf>,
        pattern: impl Into<String>,
    ) -> Result<Self, IgnitionError> {
        let path = path.into();
        let pattern = pattern.into();
        if path.as_os_str().is_empty() {
            return Err(IgnitionError::InvalidArgument(
                "addon directory path must not be empty".into(),
            ));
        }
        if pattern.trim().is_empty() {
            return Err(IgnitionError::InvalidArgument(
                "addon filename pattern must not be empty".into(),
            ));
        }
        glob::Pattern::new(&pattern).map_err(|e| {
            IgnitionError::InvalidArgument(format!("invalid addon filename pattern `{pattern}`: {e}"))
        })?;
        Ok(Self::Directory { path, pattern })
    }

    /// Explicit binary source.
    pub fn binary(path: impl Into<PathBuf>) -> Result<Self, IgnitionError> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(IgnitionError::InvalidArgument(
                "addon binary path must not be empty".into(),
            ));
        }
        Ok(Self::Binary(path))
    }

    /// Explicit in-process component source.
    pub fn component(export: ComponentExport) -> Result<Self, IgnitionError> {
        if export.contract.trim().is_empty() {
            return Err(IgnitionError::InvalidArgument(
                "component contract name must not be empty".into(),
            ));
        }
        Ok(Self::Component(export))
    }

    /// Externally supplied provider source.
    pub fn provider(provider: Arc<dyn AddonProvider>) -> Self {
        Self::Provider(provider)
    }
}

impl std::fmt::Debug for AddonSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Directory { path, pattern } => f
                .debug_struct("Directory")
                .field("path", path)
                .field("pattern", pattern)
                .finish(),
            Self::Binary(path) => f.debug_tuple("Binary").field(path).finish(),
            Self::Component(export) => f.debug_tuple("Component").field(&export.contract).finish(),
            Self::Provider(provider) => f.debug_tuple("Provider").field(&provider.origin()).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pattern_uses_platform_extension() {
        let pattern = AddonSource::default_pattern();
        assert!(pattern.starts_with("*."));
        assert!(pattern.ends_with(std::env::consts::DLL_EXTENSION));
    }

    #[test]
    fn empty_directory_path_is_rejected() {
        let result = AddonSource::directory("");
        assert!(matches!(result, Err(IgnitionError::InvalidArgument(_))));
    }

    #[test]
    fn empty_pattern_is_rejected() {
        let result = AddonSource::directory_with_pattern("/tmp", "  ");
        assert!(matches!(result, Err(IgnitionError::InvalidArgument(_))));
    }

    #[test]
    fn malformed_pattern_is_rejected() {
        let result = AddonSource::directory_with_pattern("/tmp", "[");
        assert!(matches!(result, Err(IgnitionError::InvalidArgument(_))));
    }

    #[test]
    fn empty_contract_component_is_rejected() {
        use std::sync::Arc;
        let export = ComponentExport::new("", Arc::new(1u8));
        assert!(matches!(
            AddonSource::component(export),
            Err(IgnitionError::InvalidArgument(_))
        ));
    }
}
