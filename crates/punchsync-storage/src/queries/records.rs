// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Punch record CRUD operations.
//!
//! Timestamps are canonicalized on every write and match path; the UNIQUE
//! constraint on the timestamp column makes repeated device polls idempotent.

use punchsync_core::PunchsyncError;
use punchsync_core::types::PunchRecord;
use rusqlite::params;
use tracing::info;

use crate::database::Database;
use crate::timestamp::canonicalize;

/// Sequence name feeding device_uid for locally-originated punches.
const LOCAL_UID_SEQUENCE: &str = "local_punch_uid";

/// The orderings callers may request. Restricting the sort key to this enum
/// keeps caller input out of the SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordOrder {
    #[default]
    Timestamp,
    Username,
    CreatedAt,
}

impl RecordOrder {
    fn as_sql(self) -> &'static str {
        match self {
            Self::Timestamp => "timestamp ASC",
            Self::Username => "username ASC",
            Self::CreatedAt => "created_at ASC",
        }
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> Result<PunchRecord, rusqlite::Error> {
    Ok(PunchRecord {
        id: row.get(0)?,
        device_uid: row.get(1)?,
        user_id: row.get(2)?,
        username: row.get(3)?,
        timestamp: row.get(4)?,
        status: row.get(5)?,
        punch: row.get(6)?,
        processed: row.get(7)?,
        created_at: row.get(8)?,
    })
}

const RECORD_COLUMNS: &str =
    "id, device_uid, user_id, username, timestamp, status, punch, processed, created_at";

/// Bulk-insert punch records, silently skipping timestamp collisions.
///
/// Device polls re-deliver the full event log, so most of a batch is
/// usually already present; INSERT OR IGNORE keeps the operation idempotent.
pub async fn save_punch_records(
    db: &Database,
    records: &[PunchRecord],
) -> Result<(), PunchsyncError> {
    if records.is_empty() {
        return Ok(());
    }

    let records = records.to_vec();
    let considered = records.len();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT OR IGNORE INTO punch_records (
                         device_uid, user_id, username, timestamp, status, punch, processed
                     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                )?;
                for record in &records {
                    stmt.execute(params![
                        record.device_uid,
                        record.user_id,
                        record.username,
                        canonicalize(&record.timestamp),
                        record.status,
                        record.punch,
                        record.processed,
                    ])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    info!(considered, "saved punch record batch");
    Ok(())
}

/// Insert a single punch record, returning its local row id.
///
/// When the record carries no device uid (a manually entered punch), one is
/// allocated from the store-owned sequence inside the same transaction, so
/// locally-originated punches land in their reserved uid range.
pub async fn save_punch_record(db: &Database, record: &PunchRecord) -> Result<i64, PunchsyncError> {
    let record = record.clone();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let device_uid = match record.device_uid {
                Some(uid) => uid,
                None => {
                    let uid: i64 = tx.query_row(
                        "SELECT next_value FROM id_sequences WHERE name = ?1",
                        params![LOCAL_UID_SEQUENCE],
                        |row| row.get(0),
                    )?;
                    tx.execute(
                        "UPDATE id_sequences SET next_value = next_value + 1 WHERE name = ?1",
                        params![LOCAL_UID_SEQUENCE],
                    )?;
                    uid
                }
            };

            tx.execute(
                "INSERT INTO punch_records (
                     device_uid, user_id, username, timestamp, status, punch, processed
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    device_uid,
                    record.user_id,
                    record.username,
                    canonicalize(&record.timestamp),
                    record.status,
                    record.punch,
                    record.processed,
                ],
            )?;
            let id = tx.last_insert_rowid();
            tx.commit()?;
            Ok(id)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List punch records, optionally filtered on the processed flag.
pub async fn list_punch_records(
    db: &Database,
    processed: Option<bool>,
    order: RecordOrder,
) -> Result<Vec<PunchRecord>, PunchsyncError> {
    db.connection()
        .call(move |conn| {
            let mut records = Vec::new();
            match processed {
                Some(flag) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {RECORD_COLUMNS} FROM punch_records
                         WHERE processed = ?1 ORDER BY {}",
                        order.as_sql()
                    ))?;
                    let rows = stmt.query_map(params![flag], row_to_record)?;
                    for row in rows {
                        records.push(row?);
                    }
                }
                None => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {RECORD_COLUMNS} FROM punch_records ORDER BY {}",
                        order.as_sql()
                    ))?;
                    let rows = stmt.query_map([], row_to_record)?;
                    for row in rows {
                        records.push(row?);
                    }
                }
            }
            Ok(records)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Flip `processed` to true for every record whose canonical timestamp is in
/// `timestamps`. Returns the number of rows updated; no-op on empty input.
pub async fn mark_records_processed(
    db: &Database,
    timestamps: &[String],
) -> Result<usize, PunchsyncError> {
    if timestamps.is_empty() {
        return Ok(0);
    }

    let canonical: Vec<String> = timestamps.iter().map(|ts| canonicalize(ts)).collect();
    let updated = db
        .connection()
        .call(move |conn| {
            let placeholders = vec!["?"; canonical.len()].join(",");
            let mut stmt = conn.prepare(&format!(
                "UPDATE punch_records SET processed = 1 WHERE timestamp IN ({placeholders})"
            ))?;
            let updated = stmt.execute(rusqlite::params_from_iter(canonical.iter()))?;
            Ok(updated)
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    info!(updated, "marked punch records processed");
    Ok(updated)
}

/// Update a record in place by its local id (manual edit surface).
pub async fn update_punch_record(
    db: &Database,
    record: &PunchRecord,
) -> Result<(), PunchsyncError> {
    let id = record
        .id
        .ok_or_else(|| PunchsyncError::Internal("cannot update a record without an id".into()))?;
    let record = record.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE punch_records SET
                     device_uid = ?1, user_id = ?2, username = ?3, timestamp = ?4,
                     status = ?5, punch = ?6, processed = ?7
                 WHERE id = ?8",
                params![
                    record.device_uid,
                    record.user_id,
                    record.username,
                    canonicalize(&record.timestamp),
                    record.status,
                    record.punch,
                    record.processed,
                    id,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a record by its local id (manual edit surface).
pub async fn delete_punch_record(db: &Database, id: i64) -> Result<(), PunchsyncError> {
    db.connection()
        .call(move |conn| {
            conn.execute("DELETE FROM punch_records WHERE id = ?1", params![id])?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
