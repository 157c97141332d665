// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Punchsync configuration system.

use punchsync_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_punchsync_config() {
    let toml = r#"
[service]
log_level = "debug"

[api]
base_url = "https://payroll.example.com"
request_timeout_secs = 10

[storage]
database_path = "/tmp/test.db"

[export]
dir = "/tmp/exports"

[upload]
poll_interval_secs = 1
poll_max_wait_secs = 15
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.service.log_level, "debug");
    assert_eq!(config.api.base_url, "https://payroll.example.com");
    assert_eq!(config.api.request_timeout_secs, 10);
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert_eq!(config.export.dir, "/tmp/exports");
    assert_eq!(config.upload.poll_interval_secs, 1);
    assert_eq!(config.upload.poll_max_wait_secs, 15);
}

/// Unknown fields are rejected at parse time.
#[test]
fn unknown_field_produces_error() {
    let toml = r#"
[api]
base_uri = "https://payroll.example.com"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("base_uri"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Missing sections fall back to defaults without error.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.service.log_level, "info");
    assert!(config.api.base_url.is_empty());
    assert_eq!(config.api.request_timeout_secs, 30);
    assert_eq!(config.upload.poll_interval_secs, 2);
    assert_eq!(config.upload.poll_max_wait_secs, 30);
}

/// Validation requires a base URL.
#[test]
fn validation_rejects_missing_base_url() {
    let errors = load_and_validate_str("").expect_err("empty base_url should fail validation");
    assert!(
        errors.iter().any(|e| e.field == "api.base_url"),
        "expected an api.base_url error, got: {errors:?}"
    );
}

/// Validation rejects a non-HTTP base URL.
#[test]
fn validation_rejects_non_http_base_url() {
    let toml = r#"
[api]
base_url = "ftp://payroll.example.com"
"#;
    let errors = load_and_validate_str(toml).expect_err("ftp scheme should fail validation");
    assert!(errors.iter().any(|e| e.field == "api.base_url"));
}

/// Validation rejects a poll deadline shorter than the poll interval.
#[test]
fn validation_rejects_inverted_poll_policy() {
    let toml = r#"
[api]
base_url = "https://payroll.example.com"

[upload]
poll_interval_secs = 10
poll_max_wait_secs = 5
"#;
    let errors = load_and_validate_str(toml).expect_err("inverted policy should fail");
    assert!(errors.iter().any(|e| e.field == "upload.poll_max_wait_secs"));
}

/// A fully valid config passes validation.
#[test]
fn valid_config_passes_validation() {
    let toml = r#"
[api]
base_url = "https://payroll.example.com"
"#;
    let config = load_and_validate_str(toml).expect("should validate");
    assert_eq!(config.api.base_url, "https://payroll.example.com");
}
