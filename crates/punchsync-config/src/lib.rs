// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Punchsync service.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides.
//!
//! # Usage
//!
//! ```no_run
//! use punchsync_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("API base: {}", config.api.base_url);
//! ```

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::PunchsyncConfig;
pub use validation::{ConfigError, render_errors};

/// Load configuration from the XDG hierarchy and validate it.
///
/// The high-level entry point: loads config from TOML files + env vars via
/// Figment, then runs post-deserialization validation. Returns either a
/// valid [`PunchsyncConfig`] or the list of collected errors.
pub fn load_and_validate() -> Result<PunchsyncConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![ConfigError::new("<figment>", err.to_string())]),
    }
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<PunchsyncConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![ConfigError::new("<inline>", err.to_string())]),
    }
}
