// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Batch upload and reconciliation for the Punchsync attendance bridge.
//!
//! Turns locally buffered punch records into a spreadsheet batch, submits it
//! to the payroll API, and tracks the asynchronous import job to completion
//! before marking local records processed: a small eventual-consistency
//! reconciliation between the local store and a remote job.

pub mod export;
pub mod uploader;

pub use export::ExportInfo;
pub use uploader::{PollPolicy, Uploader};
