// SPDX-FileCopyrightText: 2026 Ignition Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./ignition.toml` > `~/.config/ignition/ignition.toml`
//! > `/etc/ignition/ignition.toml` with environment variable overrides via the
//! `IGNITION_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::IgnitionConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/ignition/ignition.toml` (system-wide)
/// 3. `~/.config/ignition/ignition.toml` (user XDG config)
/// 4. `./ignition.toml` (local directory)
/// 5. `IGNITION_*` environment variables
pub fn load_config() -> Result<IgnitionConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(IgnitionConfig::default()))
        .merge(Toml::file("/etc/ignition/ignition.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("ignition/ignition.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("ignition.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<IgnitionConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(IgnitionConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<IgnitionConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(IgnitionConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `IGNITION_HOST_LOG_LEVEL` must map to
/// `host.log_level`, not `host.log.level`.
fn env_provider() -> Env {
    Env::prefixed("IGNITION_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: IGNITION_HOST_LOG_LEVEL -> "host_log_level"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("host_", "host.", 1)
            .replacen("instance_", "instance.", 1)
            .replacen("addons_", "addons.", 1);
        mapped.into()
    })
}
