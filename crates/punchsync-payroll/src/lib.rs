// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payroll API client for the Punchsync attendance bridge.
//!
//! The payroll side authenticates with an anti-forgery cookie plus a bearer
//! token, accepts month-pointing batch uploads as multipart spreadsheets,
//! and processes them through asynchronous import jobs that are observed by
//! polling. [`PayrollClient`] wraps that whole session lifecycle.

pub mod client;
pub mod types;

pub use client::PayrollClient;
pub use types::{Employee, ImportJob, ImportJobStatus, Pointing, UploadOutcome};
