// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation of the loaded configuration.

use thiserror::Error;

use crate::model::PunchsyncConfig;

/// A single configuration problem, keyed by the offending field path.
#[derive(Debug, Clone, Error)]
#[error("config error at `{field}`: {reason}")]
pub struct ConfigError {
    pub field: String,
    pub reason: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Validate constraints Figment cannot express in the type system.
///
/// Collects every problem instead of stopping at the first, so a broken
/// config file surfaces all its errors in one run.
pub fn validate_config(config: &PunchsyncConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.api.base_url.is_empty() {
        errors.push(ConfigError::new(
            "api.base_url",
            "must be set (e.g. https://payroll.example.com)",
        ));
    } else if !config.api.base_url.starts_with("http://")
        && !config.api.base_url.starts_with("https://")
    {
        errors.push(ConfigError::new(
            "api.base_url",
            "must start with http:// or https://",
        ));
    }

    if config.api.request_timeout_secs == 0 {
        errors.push(ConfigError::new(
            "api.request_timeout_secs",
            "must be at least 1",
        ));
    }

    if config.storage.database_path.is_empty() {
        errors.push(ConfigError::new("storage.database_path", "must be set"));
    }

    if config.upload.poll_interval_secs == 0 {
        errors.push(ConfigError::new(
            "upload.poll_interval_secs",
            "must be at least 1",
        ));
    }

    if config.upload.poll_max_wait_secs < config.upload.poll_interval_secs {
        errors.push(ConfigError::new(
            "upload.poll_max_wait_secs",
            "must be at least upload.poll_interval_secs",
        ));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Print collected config errors to stderr, one per line.
pub fn render_errors(errors: &[ConfigError]) {
    for error in errors {
        eprintln!("punchsync: {error}");
    }
}
