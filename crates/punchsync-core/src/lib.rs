// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Punchsync attendance bridge.
//!
//! This crate provides the shared error type, the domain model types
//! (punch records, sync configuration, upload audit entries), and the
//! device capability trait used throughout the Punchsync workspace.

pub mod error;
pub mod traits;
pub mod types;

pub use error::PunchsyncError;
pub use traits::DeviceAdapter;
pub use types::{
    DevicePunch, DeviceUser, PunchDirection, PunchRecord, SyncConfig, UploadLog, UploadStatus,
};
