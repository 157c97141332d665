// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canonical timestamp encoding for punch records.
//!
//! The device, the local store, and the payroll API exchange timestamps in
//! several textual shapes (`T` vs space separator, with or without
//! fractional seconds or a trailing `Z`). The store speaks exactly one form,
//! `YYYY-MM-DD HH:MM:SS`, and every write and match path converts through
//! [`canonicalize`] first.

use chrono::NaiveDateTime;

/// The store's canonical timestamp format: space separator, second precision.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Normalize a timestamp string to the canonical encoding.
///
/// Accepts the space- or `T`-separated forms, optional fractional seconds,
/// and an optional trailing `Z`. Input that does not parse at all is
/// returned whitespace-trimmed with the separator unified, so an exotic
/// value still matches itself on write and lookup.
pub fn canonicalize(ts: &str) -> String {
    let trimmed = ts.trim().trim_end_matches('Z');
    let unified = trimmed.replacen('T', " ", 1);

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(&unified, format) {
            return parsed.format(CANONICAL_FORMAT).to_string();
        }
    }

    unified
}
