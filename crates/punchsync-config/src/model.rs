// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Punchsync service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup. Company identity, API credentials, and job
//! cadences are NOT here; they live in the database as the singleton
//! sync-config row, managed through `punchsync config set`.

use serde::{Deserialize, Serialize};

/// Top-level Punchsync configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PunchsyncConfig {
    /// Service-wide settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Payroll API endpoint settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Batch export settings.
    #[serde(default)]
    pub export: ExportConfig,

    /// Upload reconciliation settings.
    #[serde(default)]
    pub upload: UploadConfig,
}

/// Service-wide configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Payroll API endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the payroll API, without a trailing slash.
    #[serde(default)]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("punchsync").join("punchsync.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("punchsync.db"))
        .to_string_lossy()
        .into_owned()
}

/// Batch export configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    /// Directory where batch spreadsheet files are written.
    #[serde(default = "default_export_dir")]
    pub dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
        }
    }
}

fn default_export_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("punchsync").join("exports"))
        .unwrap_or_else(|| std::path::PathBuf::from("exports"))
        .to_string_lossy()
        .into_owned()
}

/// Upload reconciliation configuration.
///
/// Bounds the post-submission poll against the remote import job: the
/// reconciler checks the job status every `poll_interval_secs` until a
/// terminal status arrives or `poll_max_wait_secs` have elapsed.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UploadConfig {
    /// Seconds between job-status polls.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Wall-clock deadline for the reconciliation wait, in seconds.
    #[serde(default = "default_poll_max_wait_secs")]
    pub poll_max_wait_secs: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            poll_max_wait_secs: default_poll_max_wait_secs(),
        }
    }
}

fn default_poll_interval_secs() -> u64 {
    2
}

fn default_poll_max_wait_secs() -> u64 {
    30
}
