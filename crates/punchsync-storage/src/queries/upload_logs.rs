// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Upload audit log operations. The log is append-only: entries are written
//! exactly once per upload attempt and never updated or deleted.

use std::str::FromStr;

use punchsync_core::PunchsyncError;
use punchsync_core::types::{UploadLog, UploadStatus};
use rusqlite::params;
use tracing::info;

use crate::database::Database;

fn row_to_log(row: &rusqlite::Row<'_>) -> Result<UploadLog, rusqlite::Error> {
    let status_text: String = row.get(4)?;
    let status = UploadStatus::from_str(&status_text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(UploadLog {
        id: row.get(0)?,
        batch_id: row.get(1)?,
        file_path: row.get(2)?,
        records_count: row.get(3)?,
        status,
        response_data: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Append one audit entry, returning its row id.
pub async fn log_api_upload(db: &Database, log: &UploadLog) -> Result<i64, PunchsyncError> {
    let batch_id = log.batch_id.clone();
    let status = log.status;
    let log = log.clone();
    let id = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO upload_logs (
                     batch_id, file_path, records_count, status, response_data
                 ) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    log.batch_id,
                    log.file_path,
                    log.records_count,
                    log.status.to_string(),
                    log.response_data,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    info!(batch_id = %batch_id, status = %status, "logged api upload");
    Ok(id)
}

/// List audit entries, most recent first.
pub async fn list_upload_logs(
    db: &Database,
    limit: Option<i64>,
) -> Result<Vec<UploadLog>, PunchsyncError> {
    db.connection()
        .call(move |conn| {
            let mut logs = Vec::new();
            match limit {
                Some(n) => {
                    let mut stmt = conn.prepare(
                        "SELECT id, batch_id, file_path, records_count, status, response_data,
                                created_at
                         FROM upload_logs ORDER BY id DESC LIMIT ?1",
                    )?;
                    let rows = stmt.query_map(params![n], row_to_log)?;
                    for row in rows {
                        logs.push(row?);
                    }
                }
                None => {
                    let mut stmt = conn.prepare(
                        "SELECT id, batch_id, file_path, records_count, status, response_data,
                                created_at
                         FROM upload_logs ORDER BY id DESC",
                    )?;
                    let rows = stmt.query_map([], row_to_log)?;
                    for row in rows {
                        logs.push(row?);
                    }
                }
            }
            Ok(logs)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
