// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `status` command: store counters and recent upload attempts.

use punchsync_config::PunchsyncConfig;
use punchsync_core::PunchsyncError;
use punchsync_storage::{RecordOrder, queries};

pub async fn run(config: &PunchsyncConfig, limit: i64) -> Result<(), PunchsyncError> {
    let db = crate::open_database(config).await?;

    match queries::sync_config::get_sync_config(&db).await? {
        Some(sync_config) => {
            println!("company:     {}", sync_config.company_id);
            println!("device:      {}:{}", sync_config.device_ip, sync_config.device_port);
        }
        None => println!("sync configuration: not set"),
    }

    let unprocessed = queries::records::list_punch_records(&db, Some(false), RecordOrder::Timestamp)
        .await?
        .len();
    let total = queries::records::list_punch_records(&db, None, RecordOrder::Timestamp)
        .await?
        .len();
    println!("records:     {total} total, {unprocessed} awaiting upload");

    let logs = queries::upload_logs::list_upload_logs(&db, Some(limit)).await?;
    if logs.is_empty() {
        println!("uploads:     none recorded");
    } else {
        println!("uploads (most recent first):");
        for log in logs {
            println!(
                "  {}  {:7}  {:3} records  {}",
                log.created_at.as_deref().unwrap_or("-"),
                log.status.to_string(),
                log.records_count,
                log.batch_id,
            );
        }
    }

    db.close().await
}
