// SPDX-FileCopyrightText: 2026 Ignition Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Ignition bootstrap framework.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Ignition configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IgnitionConfig {
    /// Host identity and logging settings.
    #[serde(default)]
    pub host: HostConfig,

    /// Single-instance enforcement settings.
    #[serde(default)]
    pub instance: InstanceConfig,

    /// Addon discovery settings.
    #[serde(default)]
    pub addons: AddonsConfig,
}

/// Host identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    /// Display name of the host application.
    #[serde(default = "default_host_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            name: default_host_name(),
            log_level: default_log_level(),
        }
    }
}

/// Single-instance enforcement configuration.
///
/// When `mutex_id` is set, the bootstrapper acquires the named resource
/// mutex at construction; the host checks `is_mutex_locked()` and exits
/// voluntarily when it lost the race.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InstanceConfig {
    /// Systemwide mutex identifier. `None` disables single-instance checks.
    #[serde(default)]
    pub mutex_id: Option<String>,

    /// Human-readable owner label written into the lock file. Defaults to
    /// the host name when empty.
    #[serde(default)]
    pub owner_label: Option<String>,
}

/// Addon discovery configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AddonsConfig {
    /// Directories scanned recursively for addon binaries.
    #[serde(default)]
    pub dirs: Vec<String>,

    /// Filename pattern for candidate binaries. Defaults to the platform
    /// dynamic-library extension when unset.
    #[serde(default)]
    pub pattern: Option<String>,
}

fn default_host_name() -> String {
    "ignition".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
