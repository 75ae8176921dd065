// SPDX-FileCopyrightText: 2026 Ignition Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The addon catalog: unions discovery sources, scans them lazily, and
//! records a per-file outcome without ever letting one bad addon abort
//! the pass.
//!
//! The catalog keeps two separate views of a scan: `known_files()` (every
//! path that was *discovered* and attempted) and `descriptors()` (the load
//! outcome per attempt). The separation is what lets a host distinguish
//! "plugin missing" from "plugin present but broken".

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ignition_core::{ComponentExport, LoadStatus};
use tracing::{debug, warn};

use crate::descriptor::AddonDescriptor;
use crate::loader::{AddonLoader, DynamicLoader};
use crate::source::AddonSource;

/// Aggregated, deduplicated set of discovery sources plus the result of the
/// most recent scan pass. Adding a source discards any previous pass; the
/// next access rescans everything.
pub struct AddonCatalog {
    sources: Vec<AddonSource>,
    loader: Arc<dyn AddonLoader>,
    pass: Option<ScanPass>,
}

/// One completed scan pass. Immutable until the catalog is rebuilt.
struct ScanPass {
    descriptors: Vec<AddonDescriptor>,
    known_files: Vec<PathBuf>,
    exports: Vec<ComponentExport>,
    /// Keeps dynamic libraries mapped while their exports are alive.
    #[allow(dead_code)]
    libraries: Vec<libloading::Library>,
}

impl AddonCatalog {
    /// Catalog using the production dynamic-library loader.
    pub fn new() -> Self {
        Self::with_loader(Arc::new(DynamicLoader))
    }

    /// Catalog with a caller-supplied loader (tests use in-process loaders).
    pub fn with_loader(loader: Arc<dyn AddonLoader>) -> Self {
        Self {
            sources: Vec::new(),
            loader,
            pass: None,
        }
    }

    /// Adds a discovery source. Cumulative: sources union into one logical
    /// catalog. Invalidates any previous scan pass.
    pub fn add(&mut self, source: AddonSource) {
        self.sources.push(source);
        self.pass = None;
    }

    /// Number of registered sources.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Every file path discovered (attempted) by the scan, independent of
    /// load outcome.
    pub fn known_files(&mut self) -> &[PathBuf] {
        &self.ensure_scanned().known_files
    }

    /// Per-attempt outcomes: loaded, rejected-empty, and failed descriptors.
    pub fn descriptors(&mut self) -> &[AddonDescriptor] {
        &self.ensure_scanned().descriptors
    }

    /// Only the descriptors that yielded usable components.
    pub fn loaded(&mut self) -> Vec<&AddonDescriptor> {
        self.ensure_scanned();
        self.pass
            .as_ref()
            .expect("scan pass present after ensure_scanned")
            .descriptors
            .iter()
            .filter(|d| d.status() == LoadStatus::Loaded)
            .collect()
    }

    /// Only the descriptors whose load failed.
    pub fn failures(&mut self) -> Vec<&AddonDescriptor> {
        self.ensure_scanned();
        self.pass
            .as_ref()
            .expect("scan pass present after ensure_scanned")
            .descriptors
            .iter()
            .filter(|d| d.status() == LoadStatus::Failed)
            .collect()
    }

    /// All usable component exports discovered by the scan, in discovery
    /// order. These feed the composition root.
    pub fn exports(&mut self) -> Vec<ComponentExport> {
        self.ensure_scanned().exports.clone()
    }

    /// Runs the scan now instead of on first access.
    pub fn scan(&mut self) {
        self.ensure_scanned();
    }

    fn ensure_scanned(&mut self) -> &ScanPass {
        if self.pass.is_none() {
            self.pass = Some(self.run_scan());
        }
        self.pass.as_ref().expect("scan pass just populated")
    }

    fn run_scan(&self) -> ScanPass {
        let mut pass = ScanPass {
            descriptors: Vec::new(),
            known_files: Vec::new(),
            exports: Vec::new(),
            libraries: Vec::new(),
        };
        // Overlapping directory sources may discover the same file; each
        // file is attempted once.
        let mut seen = HashSet::new();

        for source in &self.sources {
            match source {
                AddonSource::Directory { path, pattern } => {
                    // Constructors validate the pattern, but the variant
                    // fields are public; a hand-built source must degrade to
                    // a failed descriptor, not a panic.
                    let matcher = match glob::Pattern::new(pattern) {
                        Ok(matcher) => matcher,
                        Err(e) => {
                            warn!(
                                path = %path.display(),
                                pattern = pattern.as_str(),
                                error = %e,
                                "malformed addon filename pattern, source excluded"
                            );
                            pass.descriptors.push(AddonDescriptor::failed(
                                path.clone(),
                                path.display().to_string(),
                                format!("malformed filename pattern `{pattern}`: {e}"),
                            ));
                            continue;
                        }
                    };
                    if !path.is_dir() {
                        debug!(path = %path.display(), "addon directory missing, skipping");
                        continue;
                    }
                    let mut files = Vec::new();
                    collect_matching_files(path, &matcher, &mut files);
                    files.sort();
                    for file in files {
                        if seen.insert(file.clone()) {
                            pass.known_files.push(file.clone());
                            self.attempt_file(&file, &mut pass);
                        }
                    }
                }
                AddonSource::Binary(path) => {
                    if seen.insert(path.clone()) {
                        pass.known_files.push(path.clone());
                        self.attempt_file(path, &mut pass);
                    }
                }
                AddonSource::Component(export) => {
                    pass.descriptors.push(AddonDescriptor::loaded(
                        PathBuf::from(format!("component:{}", export.contract)),
                        export.contract.clone(),
                        vec![export.contract.clone()],
                    ));
                    pass.exports.push(export.clone());
                }
                AddonSource::Provider(provider) => {
                    let origin = PathBuf::from(provider.origin());
                    match provider.provide() {
                        Ok(exports) => {
                            record_outcome(origin, provider.origin(), exports, None, &mut pass);
                        }
                        Err(e) => {
                            warn!(
                                origin = provider.origin().as_str(),
                                error = %e,
                                "addon provider failed, excluded from catalog"
                            );
                            pass.descriptors.push(AddonDescriptor::failed(
                                origin,
                                provider.origin(),
                                e.to_string(),
                            ));
                        }
                    }
                }
            }
        }

        debug!(
            attempted = pass.descriptors.len(),
            loaded = pass
                .descriptors
                .iter()
                .filter(|d| d.status() == LoadStatus::Loaded)
                .count(),
            files = pass.known_files.len(),
            "catalog scan pass complete"
        );
        pass
    }

    /// Attempts one candidate file; any failure becomes a descriptor, never
    /// an abort.
    fn attempt_file(&self, path: &Path, pass: &mut ScanPass) {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match self.loader.load(path) {
            Ok(loaded) => {
                if let Some(library) = loaded.library {
                    pass.libraries.push(library);
                }
                record_outcome(
                    path.to_path_buf(),
                    loaded.name,
                    loaded.exports,
                    Some(name),
                    pass,
                );
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "addon load failed, excluded from catalog"
                );
                pass.descriptors
                    .push(AddonDescriptor::failed(path.to_path_buf(), name, e.to_string()));
            }
        }
    }
}

impl Default for AddonCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AddonCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddonCatalog")
            .field("sources", &self.sources)
            .field("scanned", &self.pass.is_some())
            .finish()
    }
}

/// Classifies a clean load: usable exports make it `Loaded`, none makes it
/// `RejectedEmpty`. Exports with an empty contract name are unusable and
/// dropped with a warning.
fn record_outcome(
    origin: PathBuf,
    reported_name: String,
    exports: Vec<ComponentExport>,
    fallback_name: Option<String>,
    pass: &mut ScanPass,
) {
    let name = if reported_name.trim().is_empty() {
        fallback_name.unwrap_or(reported_name)
    } else {
        reported_name
    };

    let mut usable = Vec::new();
    for export in exports {
        if export.contract.trim().is_empty() {
            warn!(
                addon = name.as_str(),
                "dropping export with empty contract name"
            );
        } else {
            usable.push(export);
        }
    }

    if usable.is_empty() {
        pass.descriptors
            .push(AddonDescriptor::rejected_empty(origin, name));
    } else {
        let contracts = usable.iter().map(|e| e.contract.clone()).collect();
        pass.descriptors
            .push(AddonDescriptor::loaded(origin, name, contracts));
        pass.exports.extend(usable);
    }
}

/// Recursive directory walk collecting files whose *name* matches the
/// pattern. Unreadable subdirectories are skipped, not errors.
fn collect_matching_files(dir: &Path, pattern: &glob::Pattern, out: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "cannot read addon directory, skipping");
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_matching_files(&path, pattern, out);
        } else if let Some(file_name) = path.file_name()
            && pattern.matches(&file_name.to_string_lossy())
        {
            out.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoadedAddon;
    use ignition_core::IgnitionError;
    use std::sync::Arc;

    /// In-process loader: files named `broken*` fail to load, `empty*`
    /// load with zero exports, everything else exports one component named
    /// after the file stem.
    struct FakeLoader;

    impl AddonLoader for FakeLoader {
        fn load(&self, path: &Path) -> Result<LoadedAddon, IgnitionError> {
            let stem = path.file_stem().unwrap().to_string_lossy().into_owned();
            if stem.starts_with("broken") {
                return Err(IgnitionError::AddonLoad {
                    path: path.display().to_string(),
                    message: "bad magic".into(),
                });
            }
            let exports = if stem.starts_with("empty") {
                vec![]
            } else {
                vec![ComponentExport::new(format!("svc.{stem}"), Arc::new(stem.clone()))]
            };
            Ok(LoadedAddon {
                name: stem,
                exports,
                library: None,
            })
        }
    }

    fn dir_with_files(files: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for file in files {
            let path = dir.path().join(file);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, b"stub").unwrap();
        }
        dir
    }

    fn catalog_for(dir: &tempfile::TempDir) -> AddonCatalog {
        let mut catalog = AddonCatalog::with_loader(Arc::new(FakeLoader));
        catalog.add(AddonSource::directory_with_pattern(dir.path(), "*.addon").unwrap());
        catalog
    }

    #[test]
    fn scan_isolates_failures_and_separates_discovered_from_loaded() {
        // 2 valid, 1 empty, 2 broken, 1 non-matching.
        let dir = dir_with_files(&[
            "alpha.addon",
            "nested/beta.addon",
            "empty.addon",
            "broken1.addon",
            "nested/broken2.addon",
            "readme.txt",
        ]);
        let mut catalog = catalog_for(&dir);

        // All five matching files were discovered and attempted.
        assert_eq!(catalog.known_files().len(), 5);

        // Exactly the two valid ones loaded.
        let loaded = catalog.loaded();
        assert_eq!(loaded.len(), 2);
        let names: Vec<&str> = loaded.iter().map(|d| d.name()).collect();
        assert!(names.contains(&"alpha"));
        assert!(names.contains(&"beta"));

        // Failures are recorded per file, with the error retained.
        let failures = catalog.failures();
        assert_eq!(failures.len(), 2);
        assert!(failures.iter().all(|d| d.error().unwrap().contains("bad magic")));

        // The empty addon is excluded but not an error.
        let rejected: Vec<_> = catalog
            .descriptors()
            .iter()
            .filter(|d| d.status() == LoadStatus::RejectedEmpty)
            .collect();
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].name(), "empty");

        // Exports come only from loaded addons.
        assert_eq!(catalog.exports().len(), 2);
    }

    #[test]
    fn missing_directory_is_silently_ignored() {
        let mut catalog = AddonCatalog::with_loader(Arc::new(FakeLoader));
        catalog.add(AddonSource::directory_with_pattern("/nonexistent/addons", "*.addon").unwrap());
        assert!(catalog.known_files().is_empty());
        assert!(catalog.descriptors().is_empty());
    }

    #[test]
    fn duplicate_sources_attempt_each_file_once() {
        let dir = dir_with_files(&["alpha.addon"]);
        let mut catalog = catalog_for(&dir);
        catalog.add(AddonSource::directory_with_pattern(dir.path(), "*.addon").unwrap());

        assert_eq!(catalog.known_files().len(), 1);
        assert_eq!(catalog.descriptors().len(), 1);
    }

    #[test]
    fn explicit_binary_source_is_discovered_even_when_load_fails() {
        let mut catalog = AddonCatalog::with_loader(Arc::new(FakeLoader));
        catalog.add(AddonSource::binary("/addons/broken-thing.addon").unwrap());

        assert_eq!(catalog.known_files().len(), 1);
        assert_eq!(catalog.failures().len(), 1);
    }

    #[test]
    fn component_source_contributes_export_without_file() {
        let mut catalog = AddonCatalog::with_loader(Arc::new(FakeLoader));
        let export = ComponentExport::new("svc.inline", Arc::new(7u32));
        catalog.add(AddonSource::component(export).unwrap());

        assert!(catalog.known_files().is_empty());
        assert_eq!(catalog.loaded().len(), 1);
        assert_eq!(catalog.exports().len(), 1);
    }

    #[test]
    fn failing_provider_is_recorded_not_fatal() {
        struct FailingProvider;
        impl ignition_core::traits::AddonProvider for FailingProvider {
            fn origin(&self) -> String {
                "provider:failing".into()
            }
            fn provide(&self) -> Result<Vec<ComponentExport>, IgnitionError> {
                Err(IgnitionError::Internal("boom".into()))
            }
        }

        let mut catalog = AddonCatalog::with_loader(Arc::new(FakeLoader));
        catalog.add(AddonSource::provider(Arc::new(FailingProvider)));
        let export = ComponentExport::new("svc.ok", Arc::new(1u8));
        catalog.add(AddonSource::component(export).unwrap());

        // The failing provider did not stop the component source.
        assert_eq!(catalog.failures().len(), 1);
        assert_eq!(catalog.loaded().len(), 1);
    }

    #[test]
    fn hand_built_directory_source_with_bad_pattern_fails_without_panicking() {
        let dir = dir_with_files(&["alpha.addon"]);
        let mut catalog = AddonCatalog::with_loader(Arc::new(FakeLoader));
        // Bypasses the validating constructor on purpose.
        catalog.add(AddonSource::Directory {
            path: dir.path().to_path_buf(),
            pattern: "[".into(),
        });
        let export = ComponentExport::new("svc.ok", Arc::new(1u8));
        catalog.add(AddonSource::component(export).unwrap());

        // The malformed source becomes a failed descriptor...
        let failures = catalog.failures();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].error().unwrap().contains("malformed filename pattern"));
        // ...and its neighbor still loads.
        assert_eq!(catalog.loaded().len(), 1);
    }

    #[test]
    fn adding_a_source_rebuilds_the_catalog() {
        let dir = dir_with_files(&["alpha.addon"]);
        let mut catalog = catalog_for(&dir);
        assert_eq!(catalog.loaded().len(), 1);

        let export = ComponentExport::new("svc.late", Arc::new(1u8));
        catalog.add(AddonSource::component(export).unwrap());
        assert_eq!(catalog.loaded().len(), 2);
    }
}
