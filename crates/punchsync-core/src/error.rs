// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Punchsync attendance bridge.

use thiserror::Error;

/// The primary error type used across all Punchsync crates.
#[derive(Debug, Error)]
pub enum PunchsyncError {
    /// Configuration errors (invalid TOML, missing required fields, missing sync config row).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, corruption).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Payroll API errors (network fault, handshake failure, unexpected response).
    #[error("api error: {message}")]
    Api {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Time-clock device errors (connection failure, protocol fault).
    #[error("device error: {message}")]
    Device {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Batch export errors (spreadsheet serialization, file I/O).
    #[error("export error: {message}")]
    Export {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
