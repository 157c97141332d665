// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The background trigger runner.
//!
//! Each job runs on its own fixed-cadence interval loop holding a child
//! cancellation token; cancelling the runner lets in-flight iterations
//! finish before the loops exit. The bounded reconciliation poll inside a
//! cycle caps the worst-case shutdown delay. One iteration completes before
//! the next timer fires, so upload cycles never overlap.

use std::time::Duration;

use punchsync_config::PunchsyncConfig;
use punchsync_core::PunchsyncError;
use punchsync_storage::{Database, queries};
use punchsync_uploader::{PollPolicy, Uploader};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Owns the cancellation token and join handles of the running triggers.
pub struct TriggerRunner {
    token: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl TriggerRunner {
    /// Start the upload trigger at the configured cadence.
    pub fn start(uploader: Uploader, upload_interval: Duration) -> Self {
        let token = CancellationToken::new();
        let handles = vec![tokio::spawn(upload_loop(
            uploader,
            upload_interval,
            token.child_token(),
        ))];
        Self { token, handles }
    }

    /// Request shutdown. Loops finish their current iteration first.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Wait for every trigger loop to exit.
    pub async fn join(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "trigger task panicked");
            }
        }
    }
}

async fn upload_loop(mut uploader: Uploader, period: Duration, token: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick fires immediately; skip it so startup does not race
    // an operator-invoked one-shot upload.
    interval.tick().await;

    info!(period_secs = period.as_secs(), "upload trigger started");
    loop {
        tokio::select! {
            _ = token.cancelled() => {
                info!("upload trigger stopping");
                break;
            }
            _ = interval.tick() => {
                uploader.upload_data().await;
            }
        }
    }
}

/// Build an uploader from the process config; the company identity and
/// credentials come lazily from the sync-config row at cycle time.
pub fn build_uploader(db: Database, config: &PunchsyncConfig) -> Uploader {
    Uploader::new(
        db,
        config.api.base_url.clone(),
        Duration::from_secs(config.api.request_timeout_secs),
        config.export.dir.clone(),
        PollPolicy::new(
            Duration::from_secs(config.upload.poll_interval_secs),
            Duration::from_secs(config.upload.poll_max_wait_secs),
        ),
    )
}

/// Run the serve loop until ctrl-c.
pub async fn run(config: &PunchsyncConfig) -> Result<(), PunchsyncError> {
    let db = crate::open_database(config).await?;

    // Fail fast when the sync-config row is absent: without it no job can
    // do anything but log errors every tick.
    let sync_config = queries::sync_config::get_sync_config(&db)
        .await?
        .ok_or_else(|| {
            PunchsyncError::Config(
                "no sync configuration found; run `punchsync config set` first".into(),
            )
        })?;

    info!(
        company_id = %sync_config.company_id,
        upload_interval_secs = sync_config.upload_interval_secs,
        "starting triggers"
    );
    // Device-side collection and user-import triggers require a device
    // adapter wired by the host; this binary ships without one.

    let uploader = build_uploader(db.clone(), config);
    let runner = TriggerRunner::start(
        uploader,
        Duration::from_secs(sync_config.upload_interval_secs.max(1) as u64),
    );

    tokio::signal::ctrl_c().await.map_err(|e| {
        PunchsyncError::Internal(format!("failed to listen for shutdown signal: {e}"))
    })?;
    info!("shutdown requested");

    runner.cancel();
    runner.join().await;
    db.close().await?;
    Ok(())
}
