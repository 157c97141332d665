// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The upload/reconciliation cycle.
//!
//! [`Uploader::upload_data`] is the single entry point external triggers
//! invoke. It reads unprocessed punch records, exports them as a batch
//! spreadsheet, submits the batch, then polls the remote import job under a
//! bounded [`PollPolicy`] and reconciles the outcome back into the store.
//! Every failure path ends in a logged message and, once a batch exists, an
//! audit entry; nothing propagates to the trigger.

use std::path::PathBuf;
use std::time::Duration;

use punchsync_core::PunchsyncError;
use punchsync_core::types::{PunchRecord, SyncConfig, UploadLog, UploadStatus};
use punchsync_payroll::{ImportJob, ImportJobStatus, PayrollClient};
use punchsync_storage::{Database, RecordOrder, queries};
use tracing::{error, info, warn};

use crate::export::{self, ExportInfo};

/// Bounds for the post-submission reconciliation wait.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    /// Delay between job-status polls.
    pub interval: Duration,
    /// Wall-clock deadline from submission.
    pub max_wait: Duration,
}

impl PollPolicy {
    pub fn new(interval: Duration, max_wait: Duration) -> Self {
        Self { interval, max_wait }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_wait: Duration::from_secs(30),
        }
    }
}

/// Terminal outcome of the bounded reconciliation wait.
#[derive(Debug)]
enum ReconcileOutcome {
    Completed(ImportJob),
    Failed(ImportJob),
    TimedOut,
}

/// Orchestrates the end-to-end batch upload and reconciliation cycle.
pub struct Uploader {
    db: Database,
    api_base_url: String,
    request_timeout: Duration,
    export_dir: PathBuf,
    policy: PollPolicy,
    client: Option<PayrollClient>,
}

impl Uploader {
    pub fn new(
        db: Database,
        api_base_url: impl Into<String>,
        request_timeout: Duration,
        export_dir: impl Into<PathBuf>,
        policy: PollPolicy,
    ) -> Self {
        Self {
            db,
            api_base_url: api_base_url.into(),
            request_timeout,
            export_dir: export_dir.into(),
            policy,
            client: None,
        }
    }

    /// Run one upload cycle. Errors are absorbed: they surface through logs
    /// and the audit trail only, so a bad cycle never takes down the trigger.
    pub async fn upload_data(&mut self) {
        // 1. Sync configuration gates the whole cycle.
        let config = match queries::sync_config::get_sync_config(&self.db).await {
            Ok(Some(config)) => config,
            Ok(None) => {
                error!("no sync configuration found, skipping upload cycle");
                return;
            }
            Err(e) => {
                error!(error = %e, "failed to load sync configuration");
                return;
            }
        };

        // 2. Anything to upload?
        let records = match queries::records::list_punch_records(
            &self.db,
            Some(false),
            RecordOrder::Username,
        )
        .await
        {
            Ok(records) => records,
            Err(e) => {
                error!(error = %e, "failed to read unprocessed punch records");
                return;
            }
        };
        if records.is_empty() {
            info!("no unprocessed punch records to upload");
            return;
        }

        // Authenticate lazily, only once there is work to submit. A failed
        // handshake aborts before any batch exists, so no audit entry.
        let db = self.db.clone();
        let policy = self.policy;
        let export = ExportInfo::allocate(&self.export_dir, records.len());
        let client = match self.ensure_client(&config).await {
            Ok(client) => client,
            Err(e) => {
                error!(error = %e, "failed to authenticate against the payroll api");
                return;
            }
        };

        // 3-5. Export, submit, reconcile. From here on a batch identity
        // exists, so unexpected failures are recorded as ERROR entries.
        if let Err(e) = run_batch(&db, client, policy, &records, &export).await {
            error!(error = %e, batch_id = %export.batch_id, "upload cycle aborted");
            let payload = serde_json::json!({ "error": e.to_string() }).to_string();
            if let Err(log_err) =
                write_audit(&db, &export, UploadStatus::Error, Some(payload)).await
            {
                error!(error = %log_err, "failed to record the error audit entry");
            }
        }
    }

    async fn ensure_client(
        &mut self,
        config: &SyncConfig,
    ) -> Result<&mut PayrollClient, PunchsyncError> {
        if self.client.is_none() {
            self.client = Some(PayrollClient::new(
                &self.api_base_url,
                &config.company_id,
                &config.api_username,
                &config.api_password,
                self.request_timeout,
            )?);
        }
        let client = self
            .client
            .as_mut()
            .ok_or_else(|| PunchsyncError::Internal("payroll client unavailable".into()))?;
        if !client.is_authenticated() {
            client.authenticate().await?;
        }
        Ok(client)
    }
}

async fn run_batch(
    db: &Database,
    client: &mut PayrollClient,
    policy: PollPolicy,
    records: &[PunchRecord],
    export: &ExportInfo,
) -> Result<(), PunchsyncError> {
    export::write_export(records, &export.file_path)?;

    // 4. Submit. A rejected submission is a recorded outcome, not an error;
    // there is no retry at this layer.
    let outcome = client.upload_attendance(&export.file_path).await?;
    if !outcome.success {
        warn!(
            batch_id = %export.batch_id,
            message = outcome.message.as_deref().unwrap_or(""),
            "batch submission rejected"
        );
        let payload = serde_json::json!({ "message": outcome.message }).to_string();
        write_audit(db, export, UploadStatus::Failed, Some(payload)).await?;
        return Ok(());
    }
    let job_execution_id = outcome.job_execution_id.ok_or_else(|| PunchsyncError::Api {
        message: "upload accepted without a job execution id".into(),
        source: None,
    })?;
    info!(batch_id = %export.batch_id, job_execution_id, "batch submitted");

    // 5. Bounded reconciliation wait.
    match poll_import(client, policy).await? {
        ReconcileOutcome::Completed(job) => {
            let events = client.pointings_for_job(job.job_execution_id).await?;
            if !events.is_empty() {
                queries::records::mark_records_processed(db, &events).await?;
            }
            let payload = job_payload(&job)?;
            write_audit(db, export, UploadStatus::Success, Some(payload)).await?;
            info!(
                batch_id = %export.batch_id,
                reconciled = events.len(),
                "upload reconciled"
            );
        }
        ReconcileOutcome::Failed(job) => {
            warn!(batch_id = %export.batch_id, status = %job.status, "remote import job failed");
            let payload = job_payload(&job)?;
            write_audit(db, export, UploadStatus::Failed, Some(payload)).await?;
        }
        ReconcileOutcome::TimedOut => {
            // Ambiguous outcome: the batch reached the API but never
            // resolved within the deadline. Recorded as PENDING for manual
            // follow-up rather than dropped.
            warn!(
                batch_id = %export.batch_id,
                max_wait_secs = policy.max_wait.as_secs(),
                "reconciliation deadline exceeded, outcome unresolved"
            );
            write_audit(db, export, UploadStatus::Pending, None).await?;
        }
    }
    Ok(())
}

/// Poll the latest import job until it reaches a terminal status or the
/// policy deadline passes.
async fn poll_import(
    client: &PayrollClient,
    policy: PollPolicy,
) -> Result<ReconcileOutcome, PunchsyncError> {
    let deadline = tokio::time::Instant::now() + policy.max_wait;
    loop {
        let job = client.latest_pointing_import().await?;
        match job.status {
            ImportJobStatus::Completed => return Ok(ReconcileOutcome::Completed(job)),
            ImportJobStatus::Failed | ImportJobStatus::Stopped => {
                return Ok(ReconcileOutcome::Failed(job));
            }
            ImportJobStatus::Started | ImportJobStatus::Starting => {
                if tokio::time::Instant::now() >= deadline {
                    return Ok(ReconcileOutcome::TimedOut);
                }
                tokio::time::sleep(policy.interval).await;
            }
            ImportJobStatus::Unknown => {
                return Err(PunchsyncError::Internal(format!(
                    "unrecognized status on import job {}",
                    job.id
                )));
            }
        }
    }
}

fn job_payload(job: &ImportJob) -> Result<String, PunchsyncError> {
    serde_json::to_string(job).map_err(|e| PunchsyncError::Internal(format!(
        "failed to serialize import job snapshot: {e}"
    )))
}

async fn write_audit(
    db: &Database,
    export: &ExportInfo,
    status: UploadStatus,
    response_data: Option<String>,
) -> Result<(), PunchsyncError> {
    let log = UploadLog {
        id: None,
        batch_id: export.batch_id.clone(),
        file_path: export.file_path.display().to_string(),
        records_count: export.records_count as i64,
        status,
        response_data,
        created_at: None,
    };
    queries::upload_logs::log_api_upload(db, &log).await?;
    Ok(())
}
