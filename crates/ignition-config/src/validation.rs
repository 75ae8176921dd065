// SPDX-FileCopyrightText: 2026 Ignition Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as known log levels and well-formed addon patterns.

use crate::diagnostic::ConfigError;
use crate::model::IgnitionConfig;

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &IgnitionConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.host.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "host.name must not be empty".to_string(),
        });
    }

    let level = config.host.log_level.trim();
    if !VALID_LOG_LEVELS.contains(&level) {
        errors.push(ConfigError::Validation {
            message: format!(
                "host.log_level `{level}` is not one of: {}",
                VALID_LOG_LEVELS.join(", ")
            ),
        });
    }

    // mutex_id, when present, must be usable as an identifier.
    if let Some(mutex_id) = &config.instance.mutex_id
        && mutex_id.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "instance.mutex_id must not be empty when set".to_string(),
        });
    }

    for dir in &config.addons.dirs {
        if dir.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "addons.dirs entries must not be empty".to_string(),
            });
        }
    }

    if let Some(pattern) = &config.addons.pattern {
        if pattern.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "addons.pattern must not be empty when set".to_string(),
            });
        } else if let Err(e) = glob_check(pattern) {
            errors.push(ConfigError::Validation {
                message: format!("addons.pattern `{pattern}` is malformed: {e}"),
            });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Minimal structural check for a filename pattern: balanced character
/// classes. The catalog re-validates with the real matcher at source
/// construction time.
fn glob_check(pattern: &str) -> Result<(), String> {
    let opens = pattern.chars().filter(|c| *c == '[').count();
    let closes = pattern.chars().filter(|c| *c == ']').count();
    if opens != closes {
        return Err("unbalanced character class".to_string());
    }
    Ok(())
}
