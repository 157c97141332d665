// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Employee provisioning from the payroll roster onto the device.

use std::collections::HashSet;
use std::sync::Arc;

use punchsync_core::{DeviceAdapter, PunchsyncError};
use punchsync_payroll::{Employee, PayrollClient};
use tracing::{debug, error, info, warn};

/// Enrolls payroll employees that are missing from the device.
pub struct UserImporter {
    device: Arc<dyn DeviceAdapter>,
}

impl UserImporter {
    pub fn new(device: Arc<dyn DeviceAdapter>) -> Self {
        Self { device }
    }

    /// Run one import pass against an authenticated client. Returns the
    /// number of employees enrolled.
    ///
    /// Roster entries with a missing id or code are skipped, as are
    /// employees already present on the device. A single enrollment failure
    /// is logged and does not abort the rest of the pass.
    pub async fn import_users(&self, client: &PayrollClient) -> Result<usize, PunchsyncError> {
        let employees = client.list_employees().await?;

        self.device.connect().await?;
        let result = self.import_connected(employees).await;
        if let Err(e) = self.device.disconnect().await {
            warn!(error = %e, "failed to disconnect from device");
        }
        result
    }

    async fn import_connected(&self, employees: Vec<Employee>) -> Result<usize, PunchsyncError> {
        let existing: HashSet<String> = self
            .device
            .get_users()
            .await?
            .into_iter()
            .map(|user| user.name)
            .collect();

        let mut imported = 0;
        for employee in employees {
            let (id, code) = match (employee.id, employee.code.as_deref()) {
                (Some(id), Some(code)) => (id, code),
                _ => {
                    warn!(?employee, "skipping employee with missing id or code");
                    continue;
                }
            };
            if existing.contains(code) {
                debug!(code, "employee already enrolled on device");
                continue;
            }
            match self.device.set_user(id, code).await {
                Ok(()) => imported += 1,
                Err(e) => error!(code, error = %e, "failed to enroll employee on device"),
            }
        }

        info!(imported, "user import finished");
        Ok(imported)
    }
}
