// SPDX-FileCopyrightText: 2026 Ignition Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scan-pass records: one descriptor per attempted addon.

use std::path::{Path, PathBuf};

use ignition_core::LoadStatus;

/// One attempted addon load. Created during a scan pass, immutable
/// thereafter, and discarded when the catalog is rebuilt.
#[derive(Debug, Clone)]
pub struct AddonDescriptor {
    origin: PathBuf,
    name: String,
    contracts: Vec<String>,
    status: LoadStatus,
    error: Option<String>,
}

impl AddonDescriptor {
    /// Descriptor for a binary that loaded with at least one usable component.
    pub fn loaded(origin: PathBuf, name: String, contracts: Vec<String>) -> Self {
        Self {
            origin,
            name,
            contracts,
            status: LoadStatus::Loaded,
            error: None,
        }
    }

    /// Descriptor for a binary that loaded cleanly but exports nothing usable.
    pub fn rejected_empty(origin: PathBuf, name: String) -> Self {
        Self {
            origin,
            name,
            contracts: Vec::new(),
            status: LoadStatus::RejectedEmpty,
            error: None,
        }
    }

    /// Descriptor for a binary whose load failed.
    pub fn failed(origin: PathBuf, name: String, error: String) -> Self {
        Self {
            origin,
            name,
            contracts: Vec::new(),
            status: LoadStatus::Failed,
            error: Some(error),
        }
    }

    /// Path (or provider origin) this descriptor was created from.
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// Addon name: the module's self-reported name, or the file stem.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Contract names exported by this addon (empty unless `Loaded`).
    pub fn contracts(&self) -> &[String] {
        &self.contracts
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    /// The recorded load error, present only when `Failed`.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
