// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Device-side jobs for the Punchsync attendance bridge.
//!
//! Both jobs are written against the opaque [`DeviceAdapter`] capability:
//! the [`AttendanceCollector`] pulls punch events into the store, and the
//! [`UserImporter`] provisions payroll employees onto the device. The wire
//! protocol behind the trait lives with whoever owns the device link.
//!
//! [`DeviceAdapter`]: punchsync_core::DeviceAdapter

pub mod collector;
pub mod importer;

pub use collector::AttendanceCollector;
pub use importer::UserImporter;
