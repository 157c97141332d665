// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Batch spreadsheet export.
//!
//! The payroll import endpoint consumes the same sheet layout the legacy
//! desktop tool produced: `No ID` / `Nom` / `Timestamp` / `Nouvel état`,
//! one row per punch, with the name column left for the payroll side to
//! resolve from the employee code.

use std::path::{Path, PathBuf};

use punchsync_core::PunchsyncError;
use punchsync_core::types::PunchRecord;
use rust_xlsxwriter::Workbook;
use tracing::info;

/// Column headers expected by the payroll import parser.
const HEADERS: [&str; 4] = ["No ID", "Nom", "Timestamp", "Nouvel état"];

/// Identity of one batch export: the audit log references uploads by these
/// three fields.
#[derive(Debug, Clone)]
pub struct ExportInfo {
    pub batch_id: String,
    pub file_path: PathBuf,
    pub records_count: usize,
}

impl ExportInfo {
    /// Allocate a batch identity under `export_dir`: a short random batch id
    /// and a per-run unique file name.
    pub fn allocate(export_dir: &Path, records_count: usize) -> Self {
        let batch_id = uuid::Uuid::new_v4().simple().to_string()[..8].to_string();
        let stamp = chrono::Local::now().format("%Y%m%d%H%M%S");
        let file_path = export_dir.join(format!("attendance_{stamp}_{batch_id}.xlsx"));
        Self {
            batch_id,
            file_path,
            records_count,
        }
    }
}

/// Write the batch spreadsheet for `records` at `path`.
pub fn write_export(records: &[PunchRecord], path: &Path) -> Result<(), PunchsyncError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| PunchsyncError::Export {
            message: format!("failed to create export directory: {e}"),
            source: Some(Box::new(e)),
        })?;
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, title) in HEADERS.iter().enumerate() {
        worksheet
            .write(0, col as u16, *title)
            .map_err(xlsx_err)?;
    }

    for (row_index, record) in records.iter().enumerate() {
        let row = (row_index + 1) as u32;
        let direction = record
            .direction()
            .map(|d| d.to_string())
            .unwrap_or_else(|| record.punch.to_string());

        worksheet.write(row, 0, record.user_id).map_err(xlsx_err)?;
        // Column 1 (Nom) intentionally left blank; the payroll side
        // resolves the display name from the employee code.
        worksheet
            .write(row, 2, record.timestamp.as_str())
            .map_err(xlsx_err)?;
        worksheet.write(row, 3, direction).map_err(xlsx_err)?;
    }

    workbook.save(path).map_err(xlsx_err)?;
    info!(count = records.len(), path = %path.display(), "created batch export");
    Ok(())
}

fn xlsx_err(e: rust_xlsxwriter::XlsxError) -> PunchsyncError {
    PunchsyncError::Export {
        message: format!("spreadsheet write failed: {e}"),
        source: Some(Box::new(e)),
    }
}
