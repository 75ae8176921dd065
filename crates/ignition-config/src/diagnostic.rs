// SPDX-FileCopyrightText: 2026 Ignition Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bridges figment failures into miette diagnostics.
//!
//! Figment reports deserialization problems one key at a time; each becomes
//! a [`ConfigError`] with a diagnostic code, and unknown keys additionally
//! get a nearest-match suggestion scored by Jaro-Winkler similarity.

use miette::Diagnostic;
use thiserror::Error;

/// Similarity floor below which no key suggestion is offered. 0.75 admits
/// transpositions like `naem` -> `name` and `patern` -> `pattern` while
/// rejecting unrelated strings.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// One configuration problem, renderable through miette.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key the model does not know about.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(ignition::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Nearest valid key, when one scores above the threshold.
        suggestion: Option<String>,
        /// Comma-separated keys the enclosing section accepts.
        valid_keys: String,
    },

    /// A value of the wrong type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(ignition::config::invalid_type), help("this key takes {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    /// A key the model requires but the sources never supplied.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(ignition::config::missing_key),
        help("set `{key}` in ignition.toml or via the IGNITION_ environment prefix")
    )]
    MissingKey { key: String },

    /// A semantic constraint violated by an otherwise well-formed value.
    #[error("validation error: {message}")]
    #[diagnostic(code(ignition::config::validation))]
    Validation { message: String },

    /// Anything figment reports that has no more specific mapping.
    #[error("configuration error: {0}")]
    #[diagnostic(code(ignition::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? this section accepts: {valid_keys}"),
        None => format!("this section accepts: {valid_keys}"),
    }
}

/// Converts a `figment::Error` into one [`ConfigError`] per underlying
/// problem, so the host can render them all in a single pass.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| match &error.kind {
            Kind::UnknownField(field, expected) => {
                let valid_keys: Vec<&str> = expected.to_vec();
                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion: suggest_key(field, &valid_keys),
                    valid_keys: valid_keys.join(", "),
                }
            }
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: field.clone().into_owned(),
            },
            Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                key: dotted_path(&error),
                detail: format!("found {actual}, expected {expected}"),
                expected: expected.to_string(),
            },
            _ => ConfigError::Other(error.to_string()),
        })
        .collect()
}

/// The error's key path in `section.key` form.
fn dotted_path(error: &figment::Error) -> String {
    error
        .path
        .iter()
        .map(|segment| segment.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// The valid key most similar to `unknown`, if any clears the threshold.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|&key| (strsim::jaro_winkler(unknown, key), key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, key)| key.to_string())
}

/// Renders each error to stderr through miette's graphical handler, falling
/// back to plain `Display` if rendering fails.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        match handler.render_report(&mut buf, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{buf}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    }
}
