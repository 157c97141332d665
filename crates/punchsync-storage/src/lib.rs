// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Punchsync attendance bridge.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a
//! single-writer concurrency model via `tokio-rusqlite`, and typed CRUD
//! operations for the sync configuration, punch records, and the append-only
//! upload audit log. Punch timestamps are normalized to one canonical
//! encoding on every write and match path.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod timestamp;

pub use database::Database;
pub use models::*;
pub use queries::records::RecordOrder;
