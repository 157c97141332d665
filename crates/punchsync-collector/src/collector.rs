// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Attendance collection from the time-clock device.
//!
//! Raw device punches become typed [`PunchRecord`]s right here, at the
//! boundary where device data enters the system; nothing dict-shaped
//! crosses into the store. Devices re-deliver their full event log on every
//! poll, so the save path's timestamp idempotence does the deduplication.

use std::collections::HashMap;
use std::sync::Arc;

use punchsync_core::types::PunchRecord;
use punchsync_core::{DeviceAdapter, PunchsyncError};
use punchsync_storage::{Database, queries};
use tracing::{info, warn};

/// Pulls punch events from the device and saves them into the store.
pub struct AttendanceCollector {
    db: Database,
    device: Arc<dyn DeviceAdapter>,
}

impl AttendanceCollector {
    pub fn new(db: Database, device: Arc<dyn DeviceAdapter>) -> Self {
        Self { db, device }
    }

    /// Run one collection pass. Returns the number of punch events read
    /// from the device (the store may keep fewer after deduplication).
    ///
    /// The device link is released on every exit path.
    pub async fn collect(&self) -> Result<usize, PunchsyncError> {
        self.device.connect().await?;
        let result = self.collect_connected().await;
        if let Err(e) = self.device.disconnect().await {
            warn!(error = %e, "failed to disconnect from device");
        }
        result
    }

    async fn collect_connected(&self) -> Result<usize, PunchsyncError> {
        let punches = self.device.get_attendance().await?;
        if punches.is_empty() {
            info!("no punch events on the device");
            return Ok(0);
        }

        let names: HashMap<i64, String> = self
            .device
            .get_users()
            .await?
            .into_iter()
            .map(|user| (user.id, user.name))
            .collect();

        let records: Vec<PunchRecord> = punches
            .into_iter()
            .map(|punch| PunchRecord {
                id: None,
                device_uid: None,
                user_id: punch.user_id,
                username: names.get(&punch.user_id).cloned().unwrap_or_default(),
                timestamp: punch.timestamp,
                status: punch.status,
                punch: punch.punch,
                processed: false,
                created_at: None,
            })
            .collect();

        let count = records.len();
        queries::records::save_punch_records(&self.db, &records).await?;
        info!(count, "collected punch events from device");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockDevice;
    use punchsync_core::types::{DevicePunch, DeviceUser};
    use punchsync_storage::RecordOrder;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn punch(user_id: i64, timestamp: &str) -> DevicePunch {
        DevicePunch {
            user_id,
            timestamp: timestamp.to_string(),
            status: 1,
            punch: 0,
        }
    }

    #[tokio::test]
    async fn collect_saves_typed_records_with_usernames() {
        let (db, _dir) = setup_db().await;
        let device = Arc::new(
            MockDevice::default()
                .with_users(vec![DeviceUser {
                    id: 7,
                    name: "ayoub".to_string(),
                }])
                .with_punches(vec![
                    punch(7, "2026-03-20 08:00:00"),
                    punch(9, "2026-03-20 08:01:00"),
                ]),
        );

        let collector = AttendanceCollector::new(db.clone(), device.clone());
        let count = collector.collect().await.unwrap();
        assert_eq!(count, 2);

        let records = queries::records::list_punch_records(&db, None, RecordOrder::Timestamp)
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].username, "ayoub");
        // Unknown device user ids still produce a record, just unnamed.
        assert_eq!(records[1].username, "");
        assert!(device.disconnect_count() > 0, "device must be released");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn repeated_polls_are_idempotent() {
        let (db, _dir) = setup_db().await;
        let device = Arc::new(
            MockDevice::default().with_punches(vec![punch(7, "2026-03-20 08:00:00")]),
        );

        let collector = AttendanceCollector::new(db.clone(), device);
        collector.collect().await.unwrap();
        collector.collect().await.unwrap();

        let records = queries::records::list_punch_records(&db, None, RecordOrder::Timestamp)
            .await
            .unwrap();
        assert_eq!(records.len(), 1, "re-delivered events must deduplicate");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn empty_device_log_is_a_noop() {
        let (db, _dir) = setup_db().await;
        let device = Arc::new(MockDevice::default());

        let collector = AttendanceCollector::new(db.clone(), device);
        let count = collector.collect().await.unwrap();
        assert_eq!(count, 0);

        let records = queries::records::list_punch_records(&db, None, RecordOrder::Timestamp)
            .await
            .unwrap();
        assert!(records.is_empty());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn connection_failure_saves_nothing() {
        let (db, _dir) = setup_db().await;
        let device = Arc::new(
            MockDevice::default()
                .failing_connect()
                .with_punches(vec![punch(7, "2026-03-20 08:00:00")]),
        );

        let collector = AttendanceCollector::new(db.clone(), device);
        let result = collector.collect().await;
        assert!(result.is_err());

        let records = queries::records::list_punch_records(&db, None, RecordOrder::Timestamp)
            .await
            .unwrap();
        assert!(records.is_empty());
        db.close().await.unwrap();
    }
}
