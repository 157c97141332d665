// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per stored entity.

pub mod records;
pub mod sync_config;
pub mod upload_logs;
