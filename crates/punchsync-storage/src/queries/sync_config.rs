// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Singleton sync-config row operations.

use punchsync_core::PunchsyncError;
use punchsync_core::types::SyncConfig;
use rusqlite::params;

use crate::database::Database;

/// Fetch the sync configuration. Absence is a valid, expected state.
pub async fn get_sync_config(db: &Database) -> Result<Option<SyncConfig>, PunchsyncError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, company_id, api_username, api_password, device_ip, device_port,
                        collection_interval_secs, upload_interval_secs, user_import_interval_secs
                 FROM sync_config LIMIT 1",
            )?;
            let result = stmt.query_row([], |row| {
                Ok(SyncConfig {
                    id: row.get(0)?,
                    company_id: row.get(1)?,
                    api_username: row.get(2)?,
                    api_password: row.get(3)?,
                    device_ip: row.get(4)?,
                    device_port: row.get(5)?,
                    collection_interval_secs: row.get(6)?,
                    upload_interval_secs: row.get(7)?,
                    user_import_interval_secs: row.get(8)?,
                })
            });
            match result {
                Ok(config) => Ok(Some(config)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Upsert the singleton sync configuration row.
pub async fn save_sync_config(db: &Database, config: &SyncConfig) -> Result<(), PunchsyncError> {
    let config = config.clone();
    db.connection()
        .call(move |conn| {
            let existing: Option<i64> = conn
                .query_row("SELECT id FROM sync_config LIMIT 1", [], |row| row.get(0))
                .map(Some)
                .or_else(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => Ok(None),
                    other => Err(other),
                })?;

            match existing {
                Some(id) => {
                    conn.execute(
                        "UPDATE sync_config SET
                             company_id = ?1, api_username = ?2, api_password = ?3,
                             device_ip = ?4, device_port = ?5,
                             collection_interval_secs = ?6, upload_interval_secs = ?7,
                             user_import_interval_secs = ?8,
                             updated_at = strftime('%Y-%m-%d %H:%M:%S', 'now')
                         WHERE id = ?9",
                        params![
                            config.company_id,
                            config.api_username,
                            config.api_password,
                            config.device_ip,
                            config.device_port,
                            config.collection_interval_secs,
                            config.upload_interval_secs,
                            config.user_import_interval_secs,
                            id,
                        ],
                    )?;
                }
                None => {
                    conn.execute(
                        "INSERT INTO sync_config (
                             company_id, api_username, api_password, device_ip, device_port,
                             collection_interval_secs, upload_interval_secs,
                             user_import_interval_secs
                         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                        params![
                            config.company_id,
                            config.api_username,
                            config.api_password,
                            config.device_ip,
                            config.device_port,
                            config.collection_interval_secs,
                            config.upload_interval_secs,
                            config.user_import_interval_secs,
                        ],
                    )?;
                }
            }
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
