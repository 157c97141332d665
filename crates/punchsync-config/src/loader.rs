// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./punchsync.toml` > `~/.config/punchsync/punchsync.toml`
//! > `/etc/punchsync/punchsync.toml` with environment variable overrides via
//! the `PUNCHSYNC_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::PunchsyncConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/punchsync/punchsync.toml` (system-wide)
/// 3. `~/.config/punchsync/punchsync.toml` (user XDG config)
/// 4. `./punchsync.toml` (local directory)
/// 5. `PUNCHSYNC_*` environment variables
pub fn load_config() -> Result<PunchsyncConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PunchsyncConfig::default()))
        .merge(Toml::file("/etc/punchsync/punchsync.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("punchsync/punchsync.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("punchsync.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<PunchsyncConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PunchsyncConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PunchsyncConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PunchsyncConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `PUNCHSYNC_API_BASE_URL` must map to
/// `api.base_url`, not `api.base.url`.
fn env_provider() -> Env {
    Env::prefixed("PUNCHSYNC_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("api_", "api.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("export_", "export.", 1)
            .replacen("upload_", "upload.", 1);
        mapped.into()
    })
}
