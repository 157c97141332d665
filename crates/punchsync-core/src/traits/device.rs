// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Time-clock device capability trait.

use async_trait::async_trait;

use crate::error::PunchsyncError;
use crate::types::{DevicePunch, DeviceUser};

/// Opaque capability over a biometric time-clock device.
///
/// The wire protocol behind this trait is out of scope for this workspace;
/// implementations live with the host that owns the device link. The
/// collector and user-importer jobs consume this trait only.
#[async_trait]
pub trait DeviceAdapter: Send + Sync + 'static {
    /// Establishes the device link. Must be called before any other operation.
    async fn connect(&self) -> Result<(), PunchsyncError>;

    /// Lists the users currently enrolled on the device.
    async fn get_users(&self) -> Result<Vec<DeviceUser>, PunchsyncError>;

    /// Reads the device's punch event log.
    async fn get_attendance(&self) -> Result<Vec<DevicePunch>, PunchsyncError>;

    /// Enrolls or updates a user on the device.
    async fn set_user(&self, user_id: i64, code: &str) -> Result<(), PunchsyncError>;

    /// Releases the device link. Safe to call when not connected.
    async fn disconnect(&self) -> Result<(), PunchsyncError>;
}
