// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types shared across the Punchsync workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The singleton sync configuration row.
///
/// Holds the company identity, payroll API credentials, device address, and
/// the cadence (in seconds) of the three background jobs. At most one row
/// exists; upload and collection cycles fail fast when it is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    pub id: Option<i64>,
    pub company_id: String,
    pub api_username: String,
    pub api_password: String,
    pub device_ip: String,
    pub device_port: u16,
    pub collection_interval_secs: i64,
    pub upload_interval_secs: i64,
    pub user_import_interval_secs: i64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            id: None,
            company_id: String::new(),
            api_username: String::new(),
            api_password: String::new(),
            device_ip: String::new(),
            device_port: 4370,
            collection_interval_secs: 300,
            upload_interval_secs: 3600,
            user_import_interval_secs: 43_200,
        }
    }
}

/// One punch event captured from the time-clock device.
///
/// The timestamp is the uniqueness key: the store keeps exactly one record
/// per canonical timestamp, and the `processed` flag only ever moves from
/// false to true (set by the upload reconciler once the payroll side has
/// confirmed the punch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PunchRecord {
    /// Local row id, assigned by the store.
    pub id: Option<i64>,
    /// Device-assigned unique id. Locally-originated punches get one from
    /// the store's reserved sequence (base 2,000,000).
    pub device_uid: Option<i64>,
    /// Employee id as known to the device.
    pub user_id: i64,
    pub username: String,
    /// Canonical `YYYY-MM-DD HH:MM:SS` encoding.
    pub timestamp: String,
    /// Raw verification-status code reported by the device.
    pub status: i64,
    /// Raw punch-direction code; see [`PunchDirection`].
    pub punch: i64,
    pub processed: bool,
    pub created_at: Option<String>,
}

impl PunchRecord {
    /// The enumerated direction for this record's punch code, if recognized.
    pub fn direction(&self) -> Option<PunchDirection> {
        PunchDirection::from_code(self.punch)
    }
}

/// Enumerated punch direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "UPPERCASE")]
pub enum PunchDirection {
    In,
    Out,
}

impl PunchDirection {
    /// Map a raw device punch code to a direction. Codes outside the
    /// entry/exit pair (some devices report break or overtime punches)
    /// are not directions and yield `None`.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::In),
            1 => Some(Self::Out),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::In => 0,
            Self::Out => 1,
        }
    }
}

/// Outcome status of one upload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "UPPERCASE")]
pub enum UploadStatus {
    /// The remote import completed and local records were reconciled.
    Success,
    /// The submission or the remote import job failed.
    Failed,
    /// An unexpected error aborted the cycle after a batch was created.
    Error,
    /// The batch was submitted but the bounded poll ended without a
    /// terminal remote status; left for manual follow-up.
    Pending,
}

/// One append-only audit entry per upload attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadLog {
    pub id: Option<i64>,
    /// Short random batch token (first 8 chars of a UUIDv4).
    pub batch_id: String,
    pub file_path: String,
    pub records_count: i64,
    pub status: UploadStatus,
    /// Opaque serialized response payload (JSON).
    pub response_data: Option<String>,
    pub created_at: Option<String>,
}

// --- Device boundary types ---

/// An employee entry as reported by the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceUser {
    pub id: i64,
    pub name: String,
}

/// A raw punch event as reported by the device.
///
/// Converted into a typed [`PunchRecord`] at the collection boundary; no
/// dict-shaped data crosses into the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevicePunch {
    pub user_id: i64,
    pub timestamp: String,
    pub status: i64,
    pub punch: i64,
}
