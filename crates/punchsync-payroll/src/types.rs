// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the payroll API.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Body of the login request.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub company_id: &'a str,
}

/// Body of the login response.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub access_token: String,
}

/// Body of a successful batch upload response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UploadResponse {
    pub job_execution_id: i64,
}

/// Result of one batch upload attempt.
///
/// A value, not an error: a rejected upload is a normal outcome the
/// reconciler records in the audit log.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub success: bool,
    pub job_execution_id: Option<i64>,
    /// Response body of a rejected upload.
    pub message: Option<String>,
}

/// Lifecycle status of a remote import job.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize, Default,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ImportJobStatus {
    Started,
    Starting,
    Completed,
    Failed,
    Stopped,
    /// Any status string this client does not recognize.
    #[serde(other)]
    #[default]
    Unknown,
}

impl ImportJobStatus {
    /// True once the remote job can make no further progress.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Stopped)
    }
}

/// Snapshot of the most recent import job for a company.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportJob {
    pub id: i64,
    pub status: ImportJobStatus,
    #[serde(default)]
    pub company_id: Option<i64>,
    pub job_execution_id: i64,
    #[serde(default)]
    pub total: Option<i64>,
    #[serde(default)]
    pub skipped: Option<i64>,
    #[serde(default)]
    pub written: Option<i64>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
}

/// One reconciled pointing: a matched entrance/exit pair. Either side may
/// be absent while the other punch is still open.
#[derive(Debug, Clone, Deserialize)]
pub struct Pointing {
    #[serde(default)]
    pub entrance: Option<String>,
    #[serde(default)]
    pub exit: Option<String>,
}

/// One employee roster entry. Entries missing an id or code are skipped by
/// the user importer.
#[derive(Debug, Clone, Deserialize)]
pub struct Employee {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_job_deserializes_from_api_shape() {
        let body = r#"{
            "id": 5,
            "status": "COMPLETED",
            "companyId": 42,
            "jobExecutionId": 99,
            "total": 12,
            "skipped": 2,
            "written": 10,
            "filename": "attendance_20260320080000_a1b2c3d4.xlsx",
            "created": "2026-03-20T08:00:05"
        }"#;
        let job: ImportJob = serde_json::from_str(body).unwrap();
        assert_eq!(job.status, ImportJobStatus::Completed);
        assert_eq!(job.job_execution_id, 99);
        assert_eq!(job.written, Some(10));
    }

    #[test]
    fn unrecognized_status_maps_to_unknown() {
        let body = r#"{"id": 1, "status": "ABANDONED", "jobExecutionId": 3}"#;
        let job: ImportJob = serde_json::from_str(body).unwrap();
        assert_eq!(job.status, ImportJobStatus::Unknown);
    }

    #[test]
    fn terminal_statuses() {
        assert!(ImportJobStatus::Completed.is_terminal());
        assert!(ImportJobStatus::Failed.is_terminal());
        assert!(ImportJobStatus::Stopped.is_terminal());
        assert!(!ImportJobStatus::Started.is_terminal());
        assert!(!ImportJobStatus::Starting.is_terminal());
        assert!(!ImportJobStatus::Unknown.is_terminal());
    }
}
